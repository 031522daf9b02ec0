pub mod csv;
pub mod paths;

pub use csv::write_results;
pub use paths::{autosave_path, error_path, same_location, DEFAULT_OUTPUT_FILE};
