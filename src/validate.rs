//! Field validation for incoming availability checks.
//!
//! Turns the loosely-typed request body into an [`AvailabilityRequest`] or a
//! [`ValidationError`] naming the first offending field. Checks run in a
//! fixed order and stop at the first failure:
//! `resourceId` → `date` → `startTime` → `durationMinutes`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::limits::*;
use crate::model::{parse_hhmm, AvailabilityRequest, Minutes};

/// Request body as received. Every field is optional and untyped so that
/// missing and malformed values can be told apart; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAvailabilityRequest {
    pub resource_id: Option<Value>,
    pub date: Option<Value>,
    pub start_time: Option<Value>,
    pub duration_minutes: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    MissingField,
    InvalidDate,
    InvalidTime,
    InvalidDuration,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::MissingField => "missing field",
            ValidationReason::InvalidDate => "expected a calendar date as YYYY-MM-DD",
            ValidationReason::InvalidTime => "expected a time as HH:MM",
            ValidationReason::InvalidDuration => "invalid duration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
    pub detail: Option<String>,
}

impl ValidationError {
    fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self {
            field,
            reason,
            detail: None,
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, ValidationReason::MissingField)
    }

    pub fn invalid_date() -> Self {
        Self::new("date", ValidationReason::InvalidDate)
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason.as_str())?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Which durations a deployment accepts.
///
/// `Minimum` is the general rule (any whole number of minutes ≥ 30).
/// `Fixed60` additionally requires exactly one hour; the engine is the same
/// under both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationPolicy {
    #[default]
    Minimum,
    Fixed60,
}

impl DurationPolicy {
    /// Stricter checks on top of the ≥ 30 minute floor.
    fn check(&self, duration: Minutes) -> Result<(), ValidationError> {
        if *self == DurationPolicy::Fixed60 && duration != FIXED_SLOT_MINUTES {
            return Err(
                ValidationError::new("durationMinutes", ValidationReason::InvalidDuration)
                    .with_detail(format!("must be exactly {FIXED_SLOT_MINUTES}")),
            );
        }
        Ok(())
    }
}

impl FromStr for DurationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimum" | "min-30" => Ok(DurationPolicy::Minimum),
            "fixed-60" | "fixed" => Ok(DurationPolicy::Fixed60),
            other => Err(format!("unknown duration policy: {other}")),
        }
    }
}

impl fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationPolicy::Minimum => write!(f, "minimum ({MIN_DURATION_MINUTES}+ minutes)"),
            DurationPolicy::Fixed60 => write!(f, "fixed-{FIXED_SLOT_MINUTES}"),
        }
    }
}

/// Parse a strict `YYYY-MM-DD` string that names a real calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    let shape_ok = b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Whole-number minutes from a JSON number. `60.0` counts; `60.5` and
/// strings do not.
fn whole_minutes(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else { return None };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.as_u64().is_some() {
        return Some(i64::MAX);
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

pub fn validate(
    raw: &RawAvailabilityRequest,
    policy: DurationPolicy,
) -> Result<AvailabilityRequest, ValidationError> {
    use ValidationReason::*;

    let resource_id = match raw.resource_id.as_ref().and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ValidationError::new("resourceId", MissingField)),
    };

    let date = match &raw.date {
        None => return Err(ValidationError::new("date", MissingField)),
        Some(v) => v
            .as_str()
            .filter(|s| parse_date(s).is_some())
            .ok_or_else(|| ValidationError::new("date", InvalidDate))?,
    };

    let start = match &raw.start_time {
        None => return Err(ValidationError::new("startTime", MissingField)),
        Some(v) => v
            .as_str()
            .and_then(parse_hhmm)
            .ok_or_else(|| ValidationError::new("startTime", InvalidTime))?,
    };

    let duration = match &raw.duration_minutes {
        None => return Err(ValidationError::new("durationMinutes", MissingField)),
        Some(v) => whole_minutes(v).ok_or_else(|| {
            ValidationError::new("durationMinutes", InvalidDuration)
                .with_detail("must be a whole number of minutes")
        })?,
    };
    if duration < MIN_DURATION_MINUTES as i64 {
        return Err(ValidationError::new("durationMinutes", InvalidDuration)
            .with_detail(format!("must be at least {MIN_DURATION_MINUTES}")));
    }
    // Anything past a day can only fail the open-hours gate; saturate.
    let duration = Minutes::try_from(duration).unwrap_or(Minutes::MAX);
    policy.check(duration)?;

    Ok(AvailabilityRequest {
        resource_id: resource_id.to_string(),
        date: date.to_string(),
        start,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawAvailabilityRequest {
        serde_json::from_value(v).unwrap()
    }

    fn ok_body() -> Value {
        json!({
            "resourceId": "court-1",
            "date": "2099-01-01",
            "startTime": "09:00",
            "durationMinutes": 60
        })
    }

    fn reject(v: Value) -> ValidationError {
        validate(&raw(v), DurationPolicy::Minimum).unwrap_err()
    }

    #[test]
    fn accepts_well_formed() {
        let req = validate(&raw(ok_body()), DurationPolicy::Minimum).unwrap();
        assert_eq!(req.resource_id, "court-1");
        assert_eq!(req.date, "2099-01-01");
        assert_eq!(req.start, 540);
        assert_eq!(req.duration, 60);
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut body = ok_body();
        body["colour"] = json!("green");
        body["players"] = json!(4);
        assert!(validate(&raw(body), DurationPolicy::Minimum).is_ok());
    }

    #[test]
    fn missing_or_empty_resource_id() {
        let mut body = ok_body();
        body.as_object_mut().unwrap().remove("resourceId");
        let err = reject(body);
        assert_eq!(err.field, "resourceId");
        assert_eq!(err.reason, ValidationReason::MissingField);

        let mut body = ok_body();
        body["resourceId"] = json!("");
        assert_eq!(reject(body).reason, ValidationReason::MissingField);

        let mut body = ok_body();
        body["resourceId"] = json!(7);
        assert_eq!(reject(body).field, "resourceId");
    }

    #[test]
    fn missing_date_names_date() {
        let mut body = ok_body();
        body.as_object_mut().unwrap().remove("date");
        let err = reject(body);
        assert_eq!(err.field, "date");
        assert_eq!(err.reason, ValidationReason::MissingField);
    }

    #[test]
    fn null_counts_as_missing() {
        let mut body = ok_body();
        body["startTime"] = Value::Null;
        let err = reject(body);
        assert_eq!(err.field, "startTime");
        assert_eq!(err.reason, ValidationReason::MissingField);
    }

    #[test]
    fn invalid_dates() {
        for bad in ["2099-02-30", "2099-13-01", "2099-1-01", "99-01-01", "2099/01/01", "tomorrow"] {
            let mut body = ok_body();
            body["date"] = json!(bad);
            let err = reject(body);
            assert_eq!(err.reason, ValidationReason::InvalidDate, "{bad}");
            assert_eq!(err.field, "date");
        }
        let mut body = ok_body();
        body["date"] = json!(20990101);
        assert_eq!(reject(body).reason, ValidationReason::InvalidDate);
    }

    #[test]
    fn leap_day_is_a_real_date() {
        assert!(parse_date("2028-02-29").is_some());
        assert!(parse_date("2027-02-29").is_none());
    }

    #[test]
    fn invalid_times() {
        for bad in ["24:00", "09:60", "9:00", "0900", ""] {
            let mut body = ok_body();
            body["startTime"] = json!(bad);
            let err = reject(body);
            assert_eq!(err.reason, ValidationReason::InvalidTime, "{bad}");
        }
    }

    #[test]
    fn duration_boundary() {
        let mut body = ok_body();
        body["durationMinutes"] = json!(30);
        assert_eq!(validate(&raw(body), DurationPolicy::Minimum).unwrap().duration, 30);

        let mut body = ok_body();
        body["durationMinutes"] = json!(29);
        let err = reject(body);
        assert_eq!(err.field, "durationMinutes");
        assert_eq!(err.reason, ValidationReason::InvalidDuration);
    }

    #[test]
    fn duration_must_be_whole_number() {
        for bad in [json!(45.5), json!("60"), json!(-60), json!(true)] {
            let mut body = ok_body();
            body["durationMinutes"] = bad.clone();
            assert_eq!(reject(body).reason, ValidationReason::InvalidDuration, "{bad}");
        }
        let mut body = ok_body();
        body["durationMinutes"] = json!(90.0);
        assert_eq!(validate(&raw(body), DurationPolicy::Minimum).unwrap().duration, 90);
    }

    #[test]
    fn huge_duration_saturates() {
        let mut body = ok_body();
        body["durationMinutes"] = json!(u64::MAX);
        assert_eq!(
            validate(&raw(body), DurationPolicy::Minimum).unwrap().duration,
            Minutes::MAX
        );
    }

    #[test]
    fn first_failure_wins() {
        let err = reject(json!({ "date": "nope", "startTime": "nope" }));
        assert_eq!(err.field, "resourceId");
        let err = reject(json!({ "resourceId": "c", "date": "nope", "startTime": "nope" }));
        assert_eq!(err.field, "date");
    }

    #[test]
    fn fixed_policy_layers_on_minimum() {
        let mut body = ok_body();
        body["durationMinutes"] = json!(90);
        let err = validate(&raw(body), DurationPolicy::Fixed60).unwrap_err();
        assert_eq!(err.reason, ValidationReason::InvalidDuration);
        assert!(err.to_string().contains("exactly 60"));

        assert!(validate(&raw(ok_body()), DurationPolicy::Fixed60).is_ok());

        let mut body = ok_body();
        body["durationMinutes"] = json!(29);
        let err = validate(&raw(body), DurationPolicy::Fixed60).unwrap_err();
        assert!(err.to_string().contains("at least 30"));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("minimum".parse::<DurationPolicy>(), Ok(DurationPolicy::Minimum));
        assert_eq!("FIXED-60".parse::<DurationPolicy>(), Ok(DurationPolicy::Fixed60));
        assert!("hourly".parse::<DurationPolicy>().is_err());
    }
}
