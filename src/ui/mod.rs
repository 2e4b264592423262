pub mod dashboard;
pub mod disk_chart;
pub mod footer;
pub mod help;
pub mod summary_table;
pub mod theme;
