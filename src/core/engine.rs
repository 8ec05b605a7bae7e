use crate::domain::model::{
    CalendarDate, DecisionSource, ModeOverride, TargetDate, Verdict, DEFAULT_TIMEZONE,
};
use crate::domain::ports::Clock;
use crate::utils::error::{HoyError, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

fn parse_timezone(timezone_name: &str) -> Result<Tz> {
    timezone_name
        .parse::<Tz>()
        .map_err(|_| HoyError::UnknownTimezone {
            name: timezone_name.to_string(),
        })
}

/// Calendar date of `instant` on the civil clock of `timezone_name`.
///
/// The zone's offset (DST included) is applied before the date fields are
/// read. An unknown zone is an error; there is no UTC fallback.
pub fn resolve_calendar_date(instant: DateTime<Utc>, timezone_name: &str) -> Result<CalendarDate> {
    let tz = parse_timezone(timezone_name)?;
    Ok(CalendarDate::from(instant.with_timezone(&tz).date_naive()))
}

/// Month/day equality on a `YYYY-MM-DD` string. The year is ignored.
pub fn is_target_date(calendar_date: &str, target_month: &str, target_day: &str) -> bool {
    // Split from the right so the year part is never inspected.
    let mut fields = calendar_date.rsplitn(3, '-');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(day), Some(month), Some(_year)) => month == target_month && day == target_day,
        _ => false,
    }
}

/// Celebrate or not. A present override wins without consulting the clock or timezone.
pub fn decide(
    instant: DateTime<Utc>,
    timezone_name: &str,
    target_month: &str,
    target_day: &str,
    mode_override: ModeOverride,
) -> Result<bool> {
    if let Some(forced) = mode_override.forced() {
        return Ok(forced);
    }

    let date = resolve_calendar_date(instant, timezone_name)?;
    Ok(is_target_date(&date.to_string(), target_month, target_day))
}

/// Immutable engine settings. The timezone is resolved once, on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    timezone_name: String,
    timezone: Tz,
    target: TargetDate,
}

impl EngineConfig {
    pub fn new(timezone_name: &str, target: TargetDate) -> Result<Self> {
        let timezone = parse_timezone(timezone_name)?;
        Ok(Self {
            timezone_name: timezone_name.to_string(),
            timezone,
            target,
        })
    }

    pub fn timezone_name(&self) -> &str {
        &self.timezone_name
    }

    pub fn target(&self) -> TargetDate {
        self.target
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone_name: DEFAULT_TIMEZONE.to_string(),
            timezone: chrono_tz::America::Bogota,
            target: TargetDate::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves the calendar date exactly once and derives the decision from it.
    pub fn evaluate(&self, instant: DateTime<Utc>, mode_override: ModeOverride) -> Verdict {
        let calendar_date =
            CalendarDate::from(instant.with_timezone(&self.config.timezone).date_naive());

        let (celebrate, source) = match mode_override.forced() {
            Some(forced) => (forced, DecisionSource::Override),
            None => (self.config.target.matches(&calendar_date), DecisionSource::Calendar),
        };

        tracing::debug!(
            "Resolved {} in {} (target {}, override {:?}) -> celebrate={}",
            calendar_date,
            self.config.timezone_name,
            self.config.target,
            mode_override,
            celebrate
        );

        Verdict {
            celebrate,
            calendar_date,
            timezone: self.config.timezone_name.clone(),
            mode_override,
            source,
        }
    }

    /// Reads `clock` once and evaluates at that instant.
    pub fn evaluate_now(&self, clock: &dyn Clock, mode_override: ModeOverride) -> Verdict {
        let instant = clock.now();
        tracing::debug!("Clock read: {}", instant.to_rfc3339());
        self.evaluate(instant, mode_override)
    }
}
