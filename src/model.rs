use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::limits::MINUTES_PER_DAY;

/// Minutes since local midnight — the only time type.
pub type Minutes = u32;

/// Parse a strict `HH:MM` wall-clock time into minutes since midnight.
///
/// Both components must be exactly two ASCII digits; hour `00..=23`,
/// minute `00..=59`.
pub fn parse_hhmm(s: &str) -> Option<Minutes> {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return None;
    }
    let digit = |c: u8| c.is_ascii_digit().then(|| (c - b'0') as Minutes);
    let hour = digit(b[0])? * 10 + digit(b[1])?;
    let minute = digit(b[3])? * 10 + digit(b[4])?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Format minutes since midnight as zero-padded `HH:MM`.
pub fn format_hhmm(m: Minutes) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Half-open interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Minutes,
    pub end: Minutes,
}

impl Span {
    pub fn new(start: Minutes, end: Minutes) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    /// Build a span, returning `None` unless `start < end`.
    pub fn try_new(start: Minutes, end: Minutes) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `self` fully contains `other`.
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

/// Wire shape of a span: `{ "start": "HH:MM", "end": "HH:MM" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl From<Span> for TimeRange {
    fn from(span: Span) -> Self {
        Self {
            start: format_hhmm(span.start),
            end: format_hhmm(span.end),
        }
    }
}

/// Hourly rate for a priced resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub hourly_rate_cents: u64,
    pub currency: String,
}

/// A bookable court: fixed daily open hours plus the bookings per date.
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: String,
    pub name: Option<String>,
    pub open_hours: Span,
    pub pricing: Option<Pricing>,
    /// Date (`YYYY-MM-DD`) → bookings in seed order. Not assumed disjoint.
    bookings: HashMap<String, Vec<Span>>,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: Option<String>, open_hours: Span) -> Self {
        debug_assert!(open_hours.end <= MINUTES_PER_DAY);
        Self {
            id: id.into(),
            name,
            open_hours,
            pricing: None,
            bookings: HashMap::new(),
        }
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Append a booking for `date`, keeping seed order.
    pub fn add_booking(&mut self, date: impl Into<String>, span: Span) {
        self.bookings.entry(date.into()).or_default().push(span);
    }

    /// Bookings on `date` in stored order; empty when the date has none.
    pub fn bookings_on(&self, date: &str) -> &[Span] {
        self.bookings.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bookings on `date` sorted ascending by start. Stable, so bookings
    /// sharing a start keep their stored order.
    pub fn sorted_bookings_on(&self, date: &str) -> Vec<Span> {
        let mut sorted = self.bookings_on(date).to_vec();
        sorted.sort_by_key(|s| s.start);
        sorted
    }
}

/// A validated availability question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub resource_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub start: Minutes,
    pub duration: Minutes,
}

/// Engine verdict for one request, before response assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub requested: Span,
    pub conflict: Option<Span>,
    pub next_available: Option<Span>,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        self.conflict.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount_cents: u64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub resource_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Price>,
}

impl AvailabilityResponse {
    pub fn new(
        request: &AvailabilityRequest,
        availability: &Availability,
        price: Option<Price>,
    ) -> Self {
        Self {
            resource_id: request.resource_id.clone(),
            date: request.date.clone(),
            start_time: format_hhmm(availability.requested.start),
            end_time: format_hhmm(availability.requested.end),
            is_available: availability.is_available(),
            conflict: availability.conflict.map(TimeRange::from),
            next_available: availability.next_available.map(TimeRange::from),
            estimated_price: price,
        }
    }
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub open_hours: TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
}

impl From<&Resource> for ResourceInfo {
    fn from(r: &Resource) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            open_hours: r.open_hours.into(),
            pricing: r.pricing.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeWindows {
    pub resource_id: String,
    pub date: String,
    pub open_hours: TimeRange,
    pub free: Vec<TimeRange>,
}
