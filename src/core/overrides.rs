use crate::domain::model::ModeOverride;
use url::form_urlencoded;

pub const OVERRIDE_PARAM: &str = "test";

/// Reads the `test` parameter of a raw query string.
///
/// Only the first occurrence counts. The value is case-folded but not trimmed,
/// so `" si"` is not recognized. Anything unrecognized is `Absent`, never an error.
pub fn parse_override(query_string: &str) -> ModeOverride {
    let query = query_string.strip_prefix('?').unwrap_or(query_string);

    let value = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == OVERRIDE_PARAM)
        .map(|(_, value)| value.to_lowercase())
        .unwrap_or_default();

    match value.as_str() {
        "si" => ModeOverride::ForcedYes,
        "no" => ModeOverride::ForcedNo,
        _ => ModeOverride::Absent,
    }
}
