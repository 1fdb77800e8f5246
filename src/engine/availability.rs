use crate::model::*;

use super::conflict::{check_open_hours, first_conflict};
use super::EngineError;

// ── Availability Algorithm ────────────────────────────────────────

/// Decide whether `[start, start + duration)` is free on `date`.
///
/// Two independent gates: the window must fit inside open hours, and it must
/// not overlap any booking. On conflict the first overlapping booking (by
/// start time) is reported together with the earliest same-length slot that
/// still fits the day, if any.
pub fn check_availability(
    resource: &Resource,
    date: &str,
    start: Minutes,
    duration: Minutes,
) -> Result<Availability, EngineError> {
    let end = start.saturating_add(duration);
    check_open_hours(&resource.open_hours, start, end)?;
    let requested = Span::new(start, end);

    let sorted = resource.sorted_bookings_on(date);
    let Some(conflict) = first_conflict(&sorted, &requested) else {
        return Ok(Availability {
            requested,
            conflict: None,
            next_available: None,
        });
    };

    Ok(Availability {
        requested,
        conflict: Some(conflict),
        next_available: next_available(&sorted, &resource.open_hours, start, duration),
    })
}

/// First-fit search for a `duration`-long gap at or after `from`.
///
/// `sorted` must be ordered by start; bookings may overlap each other. The
/// cursor only moves forward, so the result never overlaps a booking and
/// never runs past `open.end`.
pub fn next_available(
    sorted: &[Span],
    open: &Span,
    from: Minutes,
    duration: Minutes,
) -> Option<Span> {
    let mut cursor = from.max(open.start);
    for b in sorted {
        let end = cursor.checked_add(duration)?;
        if end <= b.start {
            break;
        }
        cursor = cursor.max(b.end);
    }
    let end = cursor.checked_add(duration)?;
    (end <= open.end).then(|| Span::new(cursor, end))
}

/// Free windows on `date`: open hours minus every booking, clamped.
pub fn free_windows(resource: &Resource, date: &str) -> Vec<Span> {
    let open = resource.open_hours;
    let clamped: Vec<Span> = resource
        .sorted_bookings_on(date)
        .into_iter()
        .filter_map(|b| Span::try_new(b.start.max(open.start), b.end.min(open.end)))
        .collect();
    let busy = merge_overlapping(&clamped);
    subtract_intervals(&[open], &busy)
}

/// Collapse a day's bookings, sorted by start, into disjoint busy blocks.
///
/// Overlapping and back-to-back bookings join one block: a 10:00-11:00
/// booking followed by 11:00-12:00 becomes a single 10:00-12:00 block.
pub fn merge_overlapping(bookings: &[Span]) -> Vec<Span> {
    let mut busy: Vec<Span> = Vec::new();
    for &booking in bookings {
        if let Some(block) = busy.last_mut()
            && booking.start <= block.end
        {
            block.end = block.end.max(booking.end);
            continue;
        }
        busy.push(booking);
    }
    busy
}

/// Cut busy blocks out of open-hours windows, leaving the free gaps.
///
/// Both inputs are sorted and disjoint; the busy cursor only moves forward,
/// so one pass covers every window.
pub fn subtract_intervals(open: &[Span], busy: &[Span]) -> Vec<Span> {
    let mut free = Vec::new();
    let mut next_busy = 0;

    for &window in open {
        let mut gap_start = window.start;

        while next_busy < busy.len() && busy[next_busy].end <= gap_start {
            next_busy += 1;
        }

        for block in busy[next_busy..].iter().take_while(|b| b.start < window.end) {
            if block.start > gap_start {
                free.push(Span::new(gap_start, block.start));
            }
            gap_start = gap_start.max(block.end);
        }

        if gap_start < window.end {
            free.push(Span::new(gap_start, window.end));
        }
    }

    free
}
