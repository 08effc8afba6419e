// signal_controller_main.rs
use junction_signals::engine::{
    prompt_junction_type, run_controller_loop, ControllerOptions, SignalController, USAGE,
};
use junction_signals::{LaneRing, SignalAllocator, SignalError};
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(cycles) => {
            log::info!("Signal controller stopped after {} cycles", cycles);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Controller error: {}", e);
            if matches!(e, SignalError::InvalidInput(_)) {
                eprintln!("{}", USAGE);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<u64, SignalError> {
    let options = ControllerOptions::parse(std::env::args().skip(1))?;
    let junction = match options.junction {
        Some(junction) => junction,
        None => prompt_junction_type(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    println!("Starting signal controller for a {}...", junction);
    let ring = LaneRing::create(junction)?;
    let allocator = SignalAllocator::new(options.config.allocator.clone());
    let mut controller = SignalController::new(ring, allocator, options.build_source()?)
        .with_output(Box::new(io::stdout()), options.format);
    if let Some(path) = options.chart.clone() {
        controller = controller.with_chart(path);
    }

    let controller = Arc::new(Mutex::new(controller));
    let cycles = run_controller_loop(
        Arc::clone(&controller),
        options.config.max_cycles,
        options.config.cycle_interval(),
    )
    .await?;

    if let Ok(controller) = Arc::try_unwrap(controller) {
        if let Ok(controller) = controller.into_inner() {
            controller.into_ring().destroy();
        }
    }
    Ok(cycles)
}
