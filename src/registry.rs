//! Read-only resource table.
//!
//! Built once at startup from a JSON seed and never mutated afterwards, so it
//! is shared between request handlers behind a plain `Arc` without locking.
//!
//! Seed format:
//!
//! ```json
//! { "resources": [
//!     { "id": "court-1", "name": "Centre Court",
//!       "openHours": { "start": "08:00", "end": "22:00" },
//!       "hourlyRateCents": 2000, "currency": "EUR",
//!       "bookings": { "2099-01-01": [ { "start": "10:00", "end": "11:30" } ] } }
//! ] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::engine::EngineError;
use crate::limits::*;
use crate::model::*;
use crate::validate::parse_date;

const BUILTIN_SEED: &str = include_str!("../seed/courts.json");

#[derive(Debug, Deserialize)]
struct SeedFile {
    resources: Vec<SeedResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedResource {
    id: String,
    name: Option<String>,
    open_hours: TimeRange,
    hourly_rate_cents: Option<u64>,
    currency: Option<String>,
    #[serde(default)]
    bookings: BTreeMap<String, Vec<TimeRange>>,
}

#[derive(Debug)]
pub enum RegistryError {
    Io(std::io::Error),
    Json(serde_json::Error),
    EmptyId,
    IdTooLong(String),
    DuplicateId(String),
    TooManyResources(usize),
    InvalidTime { resource: String, value: String },
    EmptySpan { resource: String, span: TimeRange },
    InvalidDate { resource: String, date: String },
    TooManyBookings { resource: String, date: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Io(e) => write!(f, "cannot read seed: {e}"),
            RegistryError::Json(e) => write!(f, "malformed seed: {e}"),
            RegistryError::EmptyId => write!(f, "resource id must not be empty"),
            RegistryError::IdTooLong(id) => write!(f, "resource id too long: {id}"),
            RegistryError::DuplicateId(id) => write!(f, "duplicate resource id: {id}"),
            RegistryError::TooManyResources(n) => {
                write!(f, "too many resources: {n} (max {MAX_RESOURCES})")
            }
            RegistryError::InvalidTime { resource, value } => {
                write!(f, "resource {resource}: invalid time {value:?}, expected HH:MM")
            }
            RegistryError::EmptySpan { resource, span } => {
                write!(
                    f,
                    "resource {resource}: span {}-{} must end after it starts",
                    span.start, span.end
                )
            }
            RegistryError::InvalidDate { resource, date } => {
                write!(f, "resource {resource}: invalid booking date {date:?}, expected YYYY-MM-DD")
            }
            RegistryError::TooManyBookings { resource, date } => {
                write!(f, "resource {resource}: too many bookings on {date}")
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Io(e) => Some(e),
            RegistryError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        RegistryError::Io(e)
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Json(e)
    }
}

fn parse_span(resource: &str, range: &TimeRange) -> Result<Span, RegistryError> {
    let time = |value: &str| {
        parse_hhmm(value).ok_or_else(|| RegistryError::InvalidTime {
            resource: resource.to_string(),
            value: value.to_string(),
        })
    };
    let start = time(&range.start)?;
    let end = time(&range.end)?;
    Span::try_new(start, end).ok_or_else(|| RegistryError::EmptySpan {
        resource: resource.to_string(),
        span: range.clone(),
    })
}

impl SeedResource {
    fn into_resource(self) -> Result<Resource, RegistryError> {
        if self.id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if self.id.len() > MAX_RESOURCE_ID_LEN {
            return Err(RegistryError::IdTooLong(self.id));
        }
        let open = parse_span(&self.id, &self.open_hours)?;
        let mut resource = Resource::new(self.id.clone(), self.name, open);
        if let Some(rate) = self.hourly_rate_cents {
            resource = resource.with_pricing(Pricing {
                hourly_rate_cents: rate,
                currency: self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            });
        }
        for (date, spans) in self.bookings {
            if parse_date(&date).is_none() {
                return Err(RegistryError::InvalidDate {
                    resource: self.id,
                    date,
                });
            }
            if spans.len() > MAX_BOOKINGS_PER_DAY {
                return Err(RegistryError::TooManyBookings {
                    resource: self.id,
                    date,
                });
            }
            // Overlapping bookings are kept as given.
            for range in &spans {
                let span = parse_span(&self.id, range)?;
                resource.add_booking(date.clone(), span);
            }
        }
        Ok(resource)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    resources: HashMap<String, Resource>,
}

impl Registry {
    pub fn from_resources(resources: Vec<Resource>) -> Result<Self, RegistryError> {
        if resources.len() > MAX_RESOURCES {
            return Err(RegistryError::TooManyResources(resources.len()));
        }
        let mut map = HashMap::with_capacity(resources.len());
        for r in resources {
            if map.contains_key(&r.id) {
                return Err(RegistryError::DuplicateId(r.id));
            }
            map.insert(r.id.clone(), r);
        }
        Ok(Self { resources: map })
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let seed: SeedFile = serde_json::from_str(json)?;
        let resources = seed
            .resources
            .into_iter()
            .map(SeedResource::into_resource)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_resources(resources)
    }

    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The seed compiled into the binary, used when no seed file is configured.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_SEED)
    }

    pub fn get(&self, id: &str) -> Result<&Resource, EngineError> {
        self.resources
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    /// All resources, sorted by id.
    pub fn list(&self) -> Vec<&Resource> {
        let mut all: Vec<&Resource> = self.resources.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_loads() {
        let reg = Registry::builtin().unwrap();
        assert!(!reg.is_empty());
        let court = reg.get("court-1").unwrap();
        assert_eq!(court.open_hours, Span::new(8 * 60, 22 * 60));
    }

    #[test]
    fn parses_bookings_and_pricing() {
        let reg = Registry::from_json(
            r#"{ "resources": [ {
                "id": "c1",
                "openHours": { "start": "08:00", "end": "22:00" },
                "hourlyRateCents": 1800,
                "bookings": { "2099-01-01": [
                    { "start": "12:00", "end": "13:00" },
                    { "start": "10:00", "end": "11:30" }
                ] }
            } ] }"#,
        )
        .unwrap();
        let c1 = reg.get("c1").unwrap();
        assert_eq!(c1.bookings_on("2099-01-01").len(), 2);
        assert_eq!(c1.bookings_on("2099-01-01")[0], Span::new(720, 780));
        let pricing = c1.pricing.as_ref().unwrap();
        assert_eq!(pricing.hourly_rate_cents, 1800);
        assert_eq!(pricing.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn overlapping_seed_bookings_are_accepted() {
        let reg = Registry::from_json(
            r#"{ "resources": [ {
                "id": "c1",
                "openHours": { "start": "08:00", "end": "22:00" },
                "bookings": { "2099-01-01": [
                    { "start": "10:00", "end": "12:00" },
                    { "start": "11:00", "end": "13:00" }
                ] }
            } ] }"#,
        );
        assert!(reg.is_ok());
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let reg = Registry::builtin().unwrap();
        let err = reg.get("nope").unwrap_err();
        assert!(matches!(err, EngineError::NotFound(ref id) if id == "nope"));
    }

    #[test]
    fn list_is_sorted_by_id() {
        let open = Span::new(480, 1320);
        let reg = Registry::from_resources(vec![
            Resource::new("b", None, open),
            Resource::new("a", None, open),
            Resource::new("c", None, open),
        ])
        .unwrap();
        let ids: Vec<&str> = reg.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let open = Span::new(480, 1320);
        let err = Registry::from_resources(vec![
            Resource::new("a", None, open),
            Resource::new("a", None, open),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(ref id) if id == "a"));
    }

    #[test]
    fn rejects_inverted_open_hours() {
        let err = Registry::from_json(
            r#"{ "resources": [ { "id": "c1", "openHours": { "start": "22:00", "end": "08:00" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::EmptySpan { .. }));
    }

    #[test]
    fn rejects_bad_times_and_dates() {
        let err = Registry::from_json(
            r#"{ "resources": [ { "id": "c1", "openHours": { "start": "8am", "end": "22:00" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTime { ref value, .. } if value == "8am"));

        let err = Registry::from_json(
            r#"{ "resources": [ {
                "id": "c1",
                "openHours": { "start": "08:00", "end": "22:00" },
                "bookings": { "2099-02-30": [ { "start": "10:00", "end": "11:00" } ] }
            } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDate { .. }));
    }

    #[test]
    fn rejects_empty_id_and_bad_json() {
        let err = Registry::from_json(
            r#"{ "resources": [ { "id": "", "openHours": { "start": "08:00", "end": "22:00" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyId));

        let err = Registry::from_json("{ not json").unwrap_err();
        assert!(matches!(err, RegistryError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir()
            .join(format!("courtslot_registry_missing_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        assert!(matches!(Registry::from_file(&path), Err(RegistryError::Io(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = std::env::temp_dir().join(format!("courtslot_registry_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");
        std::fs::write(
            &path,
            r#"{ "resources": [ { "id": "f1", "openHours": { "start": "06:00", "end": "12:00" } } ] }"#,
        )
        .unwrap();
        let reg = Registry::from_file(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("f1").unwrap().open_hours, Span::new(360, 720));
    }
}
