//! Output formatting module
//!
//! Provides the output formats:
//! - Rich terminal output with colors
//! - Tables for batch runs
//! - JSON export

pub mod json;
pub mod tables;
pub mod terminal;

pub use json::{print_json, to_json, to_json_array, write_json_file, JsonOutput};
pub use tables::{format_table, print_batch_table};
pub use terminal::{
    format_result, print_batch_summary, print_error, print_header, print_info, print_result,
    print_success, print_warning,
};
