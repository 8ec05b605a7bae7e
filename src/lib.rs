pub mod config;
pub mod core;
pub mod domain;
pub mod presentation;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use crate::core::engine::{decide, is_target_date, resolve_calendar_date, DecisionEngine, EngineConfig};
pub use crate::core::overrides::parse_override;
pub use domain::model::{CalendarDate, DecisionSource, ModeOverride, TargetDate, Verdict};
pub use domain::ports::{Clock, FixedClock, SystemClock};
pub use presentation::{Presenter, Screen};
pub use utils::error::{HoyError, Result};
