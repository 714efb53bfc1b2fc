pub mod csv_report;
pub mod formatter;

pub use csv_report::generate_csv_report;
pub use formatter::{format_breakdown, format_final_line, format_leaderboard, should_use_colors};
