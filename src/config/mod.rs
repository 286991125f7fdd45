pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;
pub mod validate;

pub use error::ConfigError;
pub use load::{apply_env_overrides, load_global_settings, load_settings};
pub use paths::{default_config_path, API_ENDPOINT_ENV, SETTINGS_FILE_NAME};
pub use save::save_settings;
pub use settings::{PollingIntervals, Settings};
