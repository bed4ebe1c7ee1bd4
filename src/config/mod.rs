pub mod yml_settings;

pub use yml_settings::{OutputFormat, YmlSettings, DEFAULT_CONFIG_FILE};
