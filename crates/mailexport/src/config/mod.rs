pub mod loader;
pub mod schema;

pub use loader::{
    export_options, load_config, load_config_from_str, parse_config, parse_config_from_str,
    validate_config,
};
pub use schema::{ExportConfig, TimestampZone, CONFIG_VERSION};
