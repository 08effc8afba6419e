use crate::data_sources::LaneDataSource;
use crate::error::SignalError;
use crate::intersection::LaneRing;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// Asks an operator for each lane's vehicle count and emergency flag.
///
/// When a follow-up source is attached, the operator is only asked for the
/// first cycle and later cycles are delegated.
pub struct InteractiveSource<R, W> {
    input: R,
    output: W,
    follow_up: Option<Box<dyn LaneDataSource + Send>>,
    prompted: bool,
}

impl InteractiveSource<BufReader<Stdin>, Stdout> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            follow_up: None,
            prompted: false,
        }
    }

    /// Hands every cycle after the first one to `source`.
    pub fn then(mut self, source: Box<dyn LaneDataSource + Send>) -> Self {
        self.follow_up = Some(source);
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<i64, SignalError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SignalError::InvalidInput(
                "input ended before all lanes were entered".to_string(),
            ));
        }
        line.trim()
            .parse::<i64>()
            .map_err(|_| SignalError::InvalidInput(format!("'{}' is not a number", line.trim())))
    }
}

impl<R: BufRead, W: Write> LaneDataSource for InteractiveSource<R, W> {
    fn name(&self) -> &str {
        "interactive"
    }

    fn fetch(&mut self, ring: &mut LaneRing) -> Result<(), SignalError> {
        if self.prompted {
            if let Some(source) = self.follow_up.as_mut() {
                return source.fetch(ring);
            }
        }

        // Answers land on a copy so a bad entry leaves the previous snapshot intact.
        let mut staged = ring.clone();
        let lane_numbers: Vec<u32> = ring.iter().map(|lane| lane.lane_number().get()).collect();
        for lane_number in lane_numbers {
            let count = self.ask(&format!("Enter vehicle count for lane {lane_number}: "))?;
            let emergency = self.ask(&format!(
                "Is there an emergency vehicle in lane {lane_number}? (0 for No, 1 for Yes): "
            ))?;
            staged.populate(lane_number, count, emergency)?;
        }
        *ring = staged;
        self.prompted = true;
        Ok(())
    }
}
