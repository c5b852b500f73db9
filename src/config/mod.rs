mod core;
mod loader;

pub use core::{
    FilesConfig, MacrosConfig, ModernizeConfig, TrailingReturnConfig, TransformsConfig,
};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    parse_and_validate_config, ConfigSource, CONFIG_FILE_NAME,
};
