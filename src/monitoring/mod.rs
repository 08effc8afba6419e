// monitoring/mod.rs
pub mod chart;
pub mod report;

pub use chart::draw_signal_chart;
pub use report::{write_json_report, write_report, write_text_report, ReportFormat};
