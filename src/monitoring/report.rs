use crate::error::SignalError;
use crate::intersection::GreenTime;
use crate::shared_data::CycleReport;
use std::io::Write;

/// How a finished cycle is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Writes the signal timing of every lane in dispatch order, then the sequence itself.
pub fn write_text_report<W: Write>(out: &mut W, report: &CycleReport) -> Result<(), SignalError> {
    writeln!(out, "\nSignal Timing and Priority Sequence ({}):", report.junction)?;
    for timing in report.dispatch_order() {
        let green = match timing.green_time {
            GreenTime::Proportional(secs) => format!("{secs} seconds"),
            GreenTime::Preemption(secs) => format!("{secs} seconds (preemption)"),
        };
        writeln!(
            out,
            "{}: Green signal for {}, Red signal for {} seconds (Priority: {}, Emergency: {})",
            timing.lane_number,
            green,
            timing.red_time,
            timing.priority,
            if timing.emergency_vehicle { "Yes" } else { "No" }
        )?;
    }
    writeln!(out, "\nPriority Sequence: {}", report.sequence)?;
    Ok(())
}

/// Writes the whole cycle as one JSON document per line.
pub fn write_json_report<W: Write>(out: &mut W, report: &CycleReport) -> Result<(), SignalError> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &CycleReport,
    format: ReportFormat,
) -> Result<(), SignalError> {
    match format {
        ReportFormat::Text => write_text_report(out, report),
        ReportFormat::Json => write_json_report(out, report),
    }
}
