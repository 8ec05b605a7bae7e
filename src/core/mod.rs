pub mod engine;
pub mod overrides;

pub use crate::domain::model::{CalendarDate, ModeOverride, TargetDate, Verdict};
pub use crate::domain::ports::{Clock, FixedClock, SystemClock};
pub use crate::utils::error::Result;
