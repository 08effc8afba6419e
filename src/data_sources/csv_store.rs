use crate::data_sources::LaneDataSource;
use crate::error::SignalError;
use crate::intersection::LaneRing;
use crate::shared_data::LaneReading;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Lane table kept as a CSV file with the columns
/// `lane_number,vehicle_count,emergency_vehicle`.
///
/// The file is read again before every cycle. Lanes missing from the file
/// are treated as empty.
pub struct CsvLaneStore {
    path: PathBuf,
}

impl CsvLaneStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the store with `readings`.
    pub fn save(&self, readings: &[LaneReading]) -> Result<(), SignalError> {
        let file = File::create(&self.path)?;
        write_readings(file, readings)
    }

    pub fn load(&self) -> Result<Vec<LaneReading>, SignalError> {
        let file = File::open(&self.path)?;
        read_readings(file)
    }
}

impl LaneDataSource for CsvLaneStore {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&mut self, ring: &mut LaneRing) -> Result<(), SignalError> {
        let readings = self.load()?;
        log::debug!("Read {} rows from {}", readings.len(), self.path.display());
        apply_readings(ring, &readings)
    }
}

pub fn read_readings<R: Read>(reader: R) -> Result<Vec<LaneReading>, SignalError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut readings = Vec::new();
    for result in rdr.deserialize() {
        let reading: LaneReading = result?;
        readings.push(reading);
    }
    Ok(readings)
}

pub fn write_readings<W: Write>(writer: W, readings: &[LaneReading]) -> Result<(), SignalError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for reading in readings {
        wtr.serialize(reading)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Replaces the ring's inputs with a full snapshot.
///
/// The snapshot is staged on a copy, so a bad row leaves the ring exactly as it was.
pub fn apply_readings(ring: &mut LaneRing, readings: &[LaneReading]) -> Result<(), SignalError> {
    let mut staged = ring.clone();
    staged.reset_inputs();
    for reading in readings {
        staged.populate_reading(reading)?;
    }
    *ring = staged;
    Ok(())
}
