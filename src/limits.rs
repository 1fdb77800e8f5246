use crate::model::Minutes;

/// Minutes in one local calendar day.
pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Shortest window a caller may ask for.
pub const MIN_DURATION_MINUTES: Minutes = 30;

/// Slot length enforced by the `fixed-60` duration policy.
pub const FIXED_SLOT_MINUTES: Minutes = 60;

pub const MAX_RESOURCE_ID_LEN: usize = 128;
pub const MAX_RESOURCES: usize = 10_000;
pub const MAX_BOOKINGS_PER_DAY: usize = 1_440;

/// Currency used when a priced resource does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";
