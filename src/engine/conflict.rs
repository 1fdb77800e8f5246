use crate::model::*;

use super::EngineError;

/// The requested window must sit entirely inside open hours. No partial
/// overlap with the opening window is tolerated.
pub(crate) fn check_open_hours(
    open: &Span,
    start: Minutes,
    end: Minutes,
) -> Result<(), EngineError> {
    if start < open.start || end > open.end {
        return Err(EngineError::OutOfHours { open: *open });
    }
    Ok(())
}

/// First booking (in the given order) overlapping `requested`.
/// Touching endpoints are not a conflict.
pub(crate) fn first_conflict(bookings: &[Span], requested: &Span) -> Option<Span> {
    bookings.iter().copied().find(|b| b.overlaps(requested))
}
