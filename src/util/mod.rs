pub mod human;
pub mod text_report;
