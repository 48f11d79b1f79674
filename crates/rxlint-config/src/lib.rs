pub mod manager;
pub mod types;

pub use manager::{ConfigError, ConfigManager, CONFIG_FILE_NAME};
pub use types::{RuleLevel, RuleSetting, RxlintConfig};
