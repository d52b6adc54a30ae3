pub mod toml_loader;

pub use toml_loader::{load_all_toml_files, load_assessment_file, parse_assessment_toml};
