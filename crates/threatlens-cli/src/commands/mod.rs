//! Command implementations.

pub mod extract;
pub mod run;
pub mod visualize;

pub use self::extract::{execute_extract, extract_with};
pub use self::run::execute_run;
pub use self::visualize::{execute_visualize, visualize_table};
