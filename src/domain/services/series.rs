//! Helpers for scope-aware edits of repeating series.
//!
//! Splitting a series "from this occurrence onward" truncates the original
//! rule at the previous occurrence and spawns a continuation event that keeps
//! the rest of the schedule. The walk uses the same stepping as expansion, so
//! truncation stays calendar-correct across month-length and leap-year
//! boundaries.

use crate::domain::models::event::{Event, RecurrenceEnd, RecurrenceRule, RepeatType};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

// Upper bound on stepping through a series when searching for an occurrence.
// Ten years of daily instances; anything past this is outside any practical
// calendar query.
const MAX_WALK: u32 = 3700;

/// Start timestamp of the series occurrence falling on `date`, or `None` when
/// the series has no occurrence that day.
pub fn occurrence_start_on(event: &Event, rule: &RecurrenceRule, date: NaiveDate) -> Option<NaiveDateTime> {
    if event.start_time.date() == date {
        return Some(event.start_time);
    }
    walk_occurrences(event, rule, |start| {
        if start.date() == date {
            Step::Found(start)
        } else if start.date() > date {
            Step::Stop
        } else {
            Step::Continue
        }
    })
}

/// Last occurrence strictly before `date`, used as the inclusive end of the
/// truncated half when splitting a series. Returns `None` when the base
/// occurrence itself falls on or after `date`, in which case a future-scoped
/// edit covers the whole series.
pub fn previous_occurrence_before(
    event: &Event,
    rule: &RecurrenceRule,
    date: NaiveDate,
) -> Option<NaiveDateTime> {
    if event.start_time.date() >= date {
        return None;
    }
    let mut last = event.start_time;
    walk_occurrences(event, rule, |start| {
        if start.date() >= date {
            Step::Stop
        } else {
            last = start;
            Step::Continue
        }
    });
    Some(last)
}

enum Step {
    Continue,
    Stop,
    Found(NaiveDateTime),
}

/// Step through the series in start order, honoring the rule's own
/// termination, and let `visit` decide when to stop. Weekly rules with a
/// weekday subset enumerate per-day within each cycle week.
fn walk_occurrences<F>(event: &Event, rule: &RecurrenceRule, mut visit: F) -> Option<NaiveDateTime>
where
    F: FnMut(NaiveDateTime) -> Step,
{
    let until = rule.until();
    let count_limit = match rule.end {
        RecurrenceEnd::Count(n) => Some(n),
        _ => None,
    };

    if let (RepeatType::Weekly, Some(days)) = (rule.repeat_type, rule.weekdays.as_ref()) {
        let base_date = event.start_time.date();
        let time_of_day = event.start_time.time();
        let anchor_monday =
            base_date - Duration::days(base_date.weekday().num_days_from_monday() as i64);
        let mut counted_cycles: u32 = 0;
        for cycle in 0..MAX_WALK as i64 {
            if let Some(limit) = count_limit {
                if counted_cycles >= limit {
                    return None;
                }
            }
            let week_start = anchor_monday + Duration::weeks(rule.interval * cycle);
            let mut produced = false;
            for offset in 0..7i64 {
                let date = week_start + Duration::days(offset);
                if !days.contains(&(offset as u8)) || date < base_date {
                    continue;
                }
                let start = date.and_time(time_of_day);
                if let Some(u) = until {
                    if start > u {
                        return None;
                    }
                }
                produced = true;
                match visit(start) {
                    Step::Continue => {}
                    Step::Stop => return None,
                    Step::Found(ts) => return Some(ts),
                }
            }
            if produced {
                counted_cycles += 1;
            }
        }
        return None;
    }

    let mut cursor = event.start_time;
    let mut produced: u32 = 0;
    for _ in 0..MAX_WALK {
        match visit(cursor) {
            Step::Continue => {}
            Step::Stop => return None,
            Step::Found(ts) => return Some(ts),
        }
        if let Some(limit) = count_limit {
            // The base occurrence consumes no count; generated instances do.
            if produced >= limit {
                return None;
            }
        }
        cursor = match rule.next_after(cursor) {
            Some(ts) => ts,
            None => return None,
        };
        produced += 1;
        if let Some(u) = until {
            if cursor > u {
                return None;
            }
        }
    }
    None
}
