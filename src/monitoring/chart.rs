use crate::shared_data::CycleReport;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

const BAR_WIDTH: f64 = 0.35;

/// Saves a bar chart of each lane's green and red seconds for one cycle.
pub fn draw_signal_chart(path: &Path, report: &CycleReport) -> Result<(), Box<dyn Error>> {
    let lanes = report.timings.len() as f64;
    let y_max = y_axis_max(report);

    let root = BitMapBackend::new(path, (800, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} signal timing (sequence {})", report.junction, report.sequence),
            ("sans-serif", 20),
        )
        .margin(30)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.5f64..lanes + 0.5, 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(report.timings.len())
        .x_label_formatter(&|x| format!("Lane {:.0}", x))
        .y_desc("Seconds")
        .draw()?;

    chart
        .draw_series(report.timings.iter().map(|t| {
            let x = f64::from(t.lane_number.get());
            let color = if t.emergency_vehicle { BLUE } else { GREEN };
            Rectangle::new([(x - BAR_WIDTH, 0), (x, t.green_time.seconds())], color.filled())
        }))?
        .label("Green")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], GREEN.filled()));

    chart
        .draw_series(report.timings.iter().map(|t| {
            let x = f64::from(t.lane_number.get());
            Rectangle::new([(x, 0), (x + BAR_WIDTH, t.red_time)], RED.filled())
        }))?
        .label("Red")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    log::info!("Signal timing chart saved to {}", path.display());
    Ok(())
}

/// Top of the y axis: the tallest bar plus some headroom.
fn y_axis_max(report: &CycleReport) -> u32 {
    let tallest = report
        .timings
        .iter()
        .map(|t| t.green_time.seconds().max(t.red_time))
        .max()
        .unwrap_or(0);
    tallest.saturating_add(tallest / 10).max(10)
}
