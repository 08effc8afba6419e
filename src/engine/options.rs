use crate::control_system::ControllerConfig;
use crate::data_sources::{CsvLaneStore, InteractiveSource, LaneDataSource, RandomTrafficSource};
use crate::error::SignalError;
use crate::global_variables::LANE_STORE_CSV;
use crate::intersection::JunctionType;
use crate::monitoring::ReportFormat;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const USAGE: &str = "Usage: signal_controller_main [--junction t|plus] \
[--source random|interactive|csv:<path>] [--cycles N] [--interval SECS] [--seed N] \
[--config <file.json>] [--json] [--chart <file.png>]";

/// Where lane snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Random,
    /// Operator enters the first snapshot, random arrivals afterwards.
    Interactive,
    Csv(PathBuf),
}

impl std::str::FromStr for SourceKind {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(SourceKind::Random),
            "interactive" => Ok(SourceKind::Interactive),
            "csv" => Ok(SourceKind::Csv(PathBuf::from(LANE_STORE_CSV))),
            other => match other.strip_prefix("csv:") {
                Some(path) if !path.is_empty() => Ok(SourceKind::Csv(PathBuf::from(path))),
                _ => Err(SignalError::InvalidInput(format!("unknown source '{other}'"))),
            },
        }
    }
}

/// Parsed command line of the controller binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    /// Asked for interactively when absent.
    pub junction: Option<JunctionType>,
    pub source: SourceKind,
    pub config: ControllerConfig,
    pub format: ReportFormat,
    pub chart: Option<PathBuf>,
}

impl ControllerOptions {
    /// Parses arguments (without the program name). A `--config` file is
    /// loaded first and the other flags override it.
    pub fn parse<I>(args: I) -> Result<Self, SignalError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut junction: Option<JunctionType> = None;
        let mut source = SourceKind::Random;
        let mut config_path = None;
        let mut cycles = None;
        let mut interval = None;
        let mut seed = None;
        let mut format = ReportFormat::Text;
        let mut chart = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--junction" => {
                    junction = Some(value(&arg, args.next())?.parse::<JunctionType>()?)
                }
                "--source" => source = value(&arg, args.next())?.parse::<SourceKind>()?,
                "--config" => config_path = Some(PathBuf::from(value(&arg, args.next())?)),
                "--cycles" => cycles = Some(number(&arg, args.next())?),
                "--interval" => interval = Some(number(&arg, args.next())?),
                "--seed" => seed = Some(number(&arg, args.next())?),
                "--json" => format = ReportFormat::Json,
                "--chart" => chart = Some(PathBuf::from(value(&arg, args.next())?)),
                other => {
                    return Err(SignalError::InvalidInput(format!(
                        "unknown argument '{other}'\n{USAGE}"
                    )))
                }
            }
        }

        let mut config = match config_path {
            Some(path) => ControllerConfig::from_json_file(path)?,
            None => ControllerConfig::default(),
        };
        if cycles.is_some() {
            config.max_cycles = cycles;
        }
        if let Some(secs) = interval {
            config.cycle_interval_secs = secs;
        }
        if seed.is_some() {
            config.seed = seed;
        }

        Ok(Self {
            junction,
            source,
            config,
            format,
            chart,
        })
    }

    /// Builds the data source these options ask for.
    pub fn build_source(&self) -> Result<Box<dyn LaneDataSource + Send>, SignalError> {
        let source: Box<dyn LaneDataSource + Send> = match &self.source {
            SourceKind::Random => Box::new(self.random_source()?),
            SourceKind::Interactive => {
                Box::new(InteractiveSource::stdin().then(Box::new(self.random_source()?)))
            }
            SourceKind::Csv(path) => Box::new(CsvLaneStore::new(path.clone())),
        };
        log::info!("Using {} lane data source", source.name());
        Ok(source)
    }

    fn random_source(&self) -> Result<RandomTrafficSource, SignalError> {
        let source = match self.config.seed {
            Some(seed) => RandomTrafficSource::seeded(seed),
            None => RandomTrafficSource::new(),
        };
        source.with_emergency_probability(self.config.emergency_probability)
    }
}

/// Asks the operator for the junction type (0 for T, 1 for +).
pub fn prompt_junction_type<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<JunctionType, SignalError> {
    write!(output, "Enter intersection type (0 for T, 1 for +): ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let code = line
        .trim()
        .parse::<i64>()
        .map_err(|_| SignalError::InvalidInput(format!("intersection type '{}'", line.trim())))?;
    JunctionType::from_code(code)
}

fn value(flag: &str, next: Option<String>) -> Result<String, SignalError> {
    next.ok_or_else(|| SignalError::InvalidInput(format!("{flag} needs a value")))
}

fn number(flag: &str, next: Option<String>) -> Result<u64, SignalError> {
    let raw = value(flag, next)?;
    raw.parse()
        .map_err(|_| SignalError::InvalidInput(format!("{flag} expects a number, got '{raw}'")))
}
