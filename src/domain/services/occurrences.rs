//! Expansion of repeating events into concrete occurrences.
//!
//! Given a base event, its recurrence rule and the exception overlay for its
//! series, `expand_event` produces every occurrence whose interval intersects
//! the query window, in ascending start order. The base occurrence itself is
//! never emitted; it is represented by the base event row. Two termination
//! disciplines coexist on purpose: weekly rules with an explicit weekday
//! subset count *week cycles* against `repeat_count`, all other modes count
//! raw instances.
//!
//! This module performs no I/O; exceptions and their replacement events are
//! bulk-loaded by the caller and handed in as an [`ExceptionOverlay`].

use crate::domain::models::event::{
    Event, EventException, ExceptionType, RecurrenceEnd, RecurrenceRule, RepeatType,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};

/// One materialized occurrence. `event` carries the instantiated start/end
/// (or, for a modified occurrence, the replacement event's fields wholesale);
/// `original_start` always points back at the base event's start.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub event: Event,
    pub original_start: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub enum ExceptionEntry {
    Deleted,
    Modified(Event),
}

/// Date-keyed overrides for a set of events, preloaded in one pass per
/// request so expansion never touches the database.
#[derive(Debug, Default)]
pub struct ExceptionOverlay {
    entries: HashMap<(i64, NaiveDate), ExceptionEntry>,
}

impl ExceptionOverlay {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble the overlay from exception rows and the replacement events
    /// they point at. A `modified` exception whose replacement row is missing
    /// is ignored rather than surfaced; the occurrence then renders from the
    /// base event as if unmodified.
    pub fn build(exceptions: Vec<EventException>, replacements: Vec<Event>) -> Self {
        let by_id: HashMap<i64, Event> = replacements.into_iter().map(|e| (e.id, e)).collect();
        let mut entries = HashMap::new();
        for exc in exceptions {
            let key = (exc.event_id, exc.exception_date);
            match exc.exception_type {
                ExceptionType::Deleted => {
                    entries.insert(key, ExceptionEntry::Deleted);
                }
                ExceptionType::Modified => {
                    if let Some(replacement) =
                        exc.modified_event_id.and_then(|id| by_id.get(&id)).cloned()
                    {
                        entries.insert(key, ExceptionEntry::Modified(replacement));
                    }
                }
            }
        }
        Self { entries }
    }

    /// Override for one occurrence date, if any. Callers consult this for the
    /// base occurrence too, since expansion never emits it.
    pub fn lookup(&self, event_id: i64, date: NaiveDate) -> Option<&ExceptionEntry> {
        self.entries.get(&(event_id, date))
    }
}

/// Expand a repeating event into the occurrences intersecting
/// `[window_start, window_end]`. Returns an empty vector for non-repeating
/// events or events whose recurrence fields fail to parse (creation-time
/// validation makes the latter unreachable in practice).
pub fn expand_event(
    event: &Event,
    overlay: &ExceptionOverlay,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<Occurrence> {
    let rule = match event.recurrence_rule() {
        Ok(rule) if rule.is_repeating() => rule,
        _ => return Vec::new(),
    };

    match (rule.repeat_type, rule.weekdays.clone()) {
        (RepeatType::Weekly, Some(days)) => {
            expand_week_cycles(event, &rule, &days, overlay, window_start, window_end)
        }
        _ => expand_unit_steps(event, &rule, overlay, window_start, window_end),
    }
}

/// Weekly rules with an explicit weekday set advance in week cycles of
/// `interval` weeks, anchored at the week containing the base start. A cycle
/// counts toward `repeat_count` iff it produced at least one occurrence date
/// on or after the base date (the base-coincident one included).
fn expand_week_cycles(
    event: &Event,
    rule: &RecurrenceRule,
    days: &BTreeSet<u8>,
    overlay: &ExceptionOverlay,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<Occurrence> {
    let base_date = event.start_time.date();
    let time_of_day = event.start_time.time();
    let duration = event.duration();
    let anchor_monday =
        base_date - Duration::days(base_date.weekday().num_days_from_monday() as i64);

    let until = rule.until();
    let horizon = match until {
        Some(u) => window_end.date().min(u.date()),
        None => window_end.date(),
    };

    let mut occurrences = Vec::new();
    let mut counted_cycles: u32 = 0;

    for cycle in 0.. {
        let week_start = anchor_monday + Duration::weeks(rule.interval * cycle);
        if week_start > horizon {
            break;
        }
        if let RecurrenceEnd::Count(limit) = rule.end {
            if counted_cycles >= limit {
                break;
            }
        }

        let mut produced = false;
        for offset in 0..7i64 {
            let date = week_start + Duration::days(offset);
            // Weeks are enumerated Monday-first, so `offset` is the weekday index.
            if !days.contains(&(offset as u8)) || date < base_date {
                continue;
            }
            let start = date.and_time(time_of_day);
            if let Some(u) = until {
                // repeat_until is inclusive.
                if start > u {
                    continue;
                }
            }
            produced = true;
            if start == event.start_time {
                continue;
            }
            let end = start + duration;
            if start <= window_end && end >= window_start {
                if let Some(occ) = apply_overlay(event, overlay, start, end) {
                    occurrences.push(occ);
                }
            }
        }
        if produced {
            counted_cycles += 1;
        }
    }

    occurrences
}

/// Daily, monthly, yearly and plain-weekly rules step one interval unit at a
/// time from the base start. `repeat_count` counts raw instances here, and an
/// instance before the window still consumes the count.
fn expand_unit_steps(
    event: &Event,
    rule: &RecurrenceRule,
    overlay: &ExceptionOverlay,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<Occurrence> {
    let duration = event.duration();
    let until = rule.until();

    let mut occurrences = Vec::new();
    let mut produced: u32 = 0;
    let mut cursor = match rule.next_after(event.start_time) {
        Some(ts) => ts,
        None => return occurrences,
    };

    loop {
        if let RecurrenceEnd::Count(limit) = rule.end {
            if produced >= limit {
                break;
            }
        }
        if let Some(u) = until {
            if cursor > u {
                break;
            }
        }
        if cursor > window_end {
            break;
        }

        produced += 1;
        let end = cursor + duration;
        if end >= window_start {
            if let Some(occ) = apply_overlay(event, overlay, cursor, end) {
                occurrences.push(occ);
            }
        }

        cursor = match rule.next_after(cursor) {
            Some(ts) => ts,
            None => break,
        };
    }

    occurrences
}

fn apply_overlay(
    event: &Event,
    overlay: &ExceptionOverlay,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Option<Occurrence> {
    match overlay.lookup(event.id, start.date()) {
        Some(ExceptionEntry::Deleted) => None,
        Some(ExceptionEntry::Modified(replacement)) => Some(Occurrence {
            event: replacement.clone(),
            original_start: event.start_time,
        }),
        None => {
            let mut instance = event.clone();
            instance.start_time = start;
            instance.end_time = end;
            Some(Occurrence {
                event: instance,
                original_start: event.start_time,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::{EventException, RepeatEndType};
    use chrono::{NaiveDate, Utc};

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn base_event(start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event {
            id: 1,
            user_id: 10,
            created_by: 10,
            title: "Training".to_string(),
            description: None,
            start_time: start,
            end_time: end,
            all_day: false,
            repeat_type: RepeatType::None,
            repeat_interval: 1,
            repeat_days: None,
            repeat_end_type: RepeatEndType::Never,
            repeat_until: None,
            repeat_count: None,
            parent_event_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn non_repeating_event_expands_to_nothing() {
        let event = base_event(dt(2024, 3, 1, 8, 0), dt(2024, 3, 1, 9, 0));
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2024, 1, 1, 0, 0),
            dt(2024, 12, 31, 0, 0),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn base_occurrence_is_never_duplicated() {
        let mut event = base_event(dt(2024, 3, 1, 8, 0), dt(2024, 3, 1, 9, 0));
        event.repeat_type = RepeatType::Daily;
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2024, 3, 1, 0, 0),
            dt(2024, 3, 4, 23, 59),
        );
        assert!(out.iter().all(|o| o.event.start_time != event.start_time));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn repeat_until_is_inclusive() {
        let mut event = base_event(dt(2024, 3, 1, 8, 0), dt(2024, 3, 1, 9, 0));
        event.repeat_type = RepeatType::Daily;
        event.repeat_end_type = RepeatEndType::Date;
        event.repeat_until = Some(dt(2024, 3, 3, 8, 0));
        let window = (dt(2024, 3, 1, 0, 0), dt(2024, 3, 10, 0, 0));
        let out = expand_event(&event, &ExceptionOverlay::empty(), window.0, window.1);
        assert_eq!(
            out.iter().map(|o| o.event.start_time).collect::<Vec<_>>(),
            vec![dt(2024, 3, 2, 8, 0), dt(2024, 3, 3, 8, 0)]
        );

        // One minute earlier excludes the boundary occurrence.
        event.repeat_until = Some(dt(2024, 3, 3, 7, 59));
        let out = expand_event(&event, &ExceptionOverlay::empty(), window.0, window.1);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn every_two_days_for_three_instances() {
        let mut event = base_event(dt(2024, 3, 1, 8, 0), dt(2024, 3, 1, 9, 0));
        event.repeat_type = RepeatType::Daily;
        event.repeat_interval = 2;
        event.repeat_end_type = RepeatEndType::Count;
        event.repeat_count = Some(3);
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2024, 1, 1, 0, 0),
            dt(2024, 12, 31, 0, 0),
        );
        assert_eq!(
            out.iter().map(|o| o.event.start_time).collect::<Vec<_>>(),
            vec![dt(2024, 3, 3, 8, 0), dt(2024, 3, 5, 8, 0), dt(2024, 3, 7, 8, 0)]
        );
    }

    #[test]
    fn weekly_count_is_measured_in_week_cycles() {
        // Base starts Monday 2024-03-04; Mon/Wed/Fri for two week cycles
        // means up to six concrete dates, five of them generated.
        let mut event = base_event(dt(2024, 3, 4, 7, 0), dt(2024, 3, 4, 8, 0));
        event.repeat_type = RepeatType::Weekly;
        event.repeat_days = Some("0,2,4".to_string());
        event.repeat_end_type = RepeatEndType::Count;
        event.repeat_count = Some(2);
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2024, 1, 1, 0, 0),
            dt(2024, 12, 31, 0, 0),
        );
        assert_eq!(
            out.iter().map(|o| o.event.start_time).collect::<Vec<_>>(),
            vec![
                dt(2024, 3, 6, 7, 0),
                dt(2024, 3, 8, 7, 0),
                dt(2024, 3, 11, 7, 0),
                dt(2024, 3, 13, 7, 0),
                dt(2024, 3, 15, 7, 0),
            ]
        );
    }

    #[test]
    fn weekly_days_before_base_date_are_skipped() {
        // Base starts Wednesday; the Monday of the base week must not appear.
        let mut event = base_event(dt(2024, 3, 6, 18, 0), dt(2024, 3, 6, 19, 0));
        event.repeat_type = RepeatType::Weekly;
        event.repeat_days = Some("0,2".to_string());
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2024, 3, 1, 0, 0),
            dt(2024, 3, 12, 0, 0),
        );
        assert_eq!(
            out.iter().map(|o| o.event.start_time).collect::<Vec<_>>(),
            vec![dt(2024, 3, 11, 18, 0)]
        );
    }

    #[test]
    fn yearly_series_across_multi_year_window() {
        let mut event = base_event(dt(2024, 1, 15, 9, 0), dt(2024, 1, 15, 10, 0));
        event.repeat_type = RepeatType::Yearly;
        event.repeat_end_type = RepeatEndType::Date;
        event.repeat_until = Some(dt(2027, 1, 15, 9, 0));
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2025, 1, 1, 0, 0),
            dt(2026, 12, 31, 0, 0),
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].event.start_time, dt(2025, 1, 15, 9, 0));
        assert_eq!(out[1].event.start_time, dt(2026, 1, 15, 9, 0));
        assert!(out.iter().all(|o| o.original_start == dt(2024, 1, 15, 9, 0)));
    }

    #[test]
    fn overlay_deletes_and_substitutes_occurrences() {
        let mut event = base_event(dt(2024, 3, 4, 7, 0), dt(2024, 3, 4, 8, 0));
        event.repeat_type = RepeatType::Weekly;

        let mut replacement = base_event(dt(2024, 3, 18, 9, 30), dt(2024, 3, 18, 10, 30));
        replacement.id = 99;
        replacement.title = "Moved session".to_string();

        let exceptions = vec![
            EventException {
                id: 1,
                event_id: event.id,
                exception_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
                exception_type: ExceptionType::Deleted,
                modified_event_id: None,
                created_at: Utc::now(),
            },
            EventException {
                id: 2,
                event_id: event.id,
                exception_date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
                exception_type: ExceptionType::Modified,
                modified_event_id: Some(99),
                created_at: Utc::now(),
            },
        ];
        let overlay = ExceptionOverlay::build(exceptions, vec![replacement]);

        let out = expand_event(&event, &overlay, dt(2024, 3, 1, 0, 0), dt(2024, 3, 31, 0, 0));
        let starts: Vec<_> = out.iter().map(|o| o.event.start_time).collect();
        assert!(!starts.contains(&dt(2024, 3, 11, 7, 0)));

        let modified = out
            .iter()
            .find(|o| o.event.start_time == dt(2024, 3, 18, 9, 30))
            .expect("modified occurrence present");
        assert_eq!(modified.event.title, "Moved session");
        assert_eq!(modified.event.id, 99);
        assert_eq!(modified.original_start, event.start_time);
    }

    #[test]
    fn partial_window_overlap_is_included() {
        let mut event = base_event(dt(2024, 3, 1, 23, 0), dt(2024, 3, 2, 1, 0));
        event.repeat_type = RepeatType::Daily;
        // Window covers only the first hour of the March 3rd instance.
        let out = expand_event(
            &event,
            &ExceptionOverlay::empty(),
            dt(2024, 3, 3, 23, 30),
            dt(2024, 3, 3, 23, 45),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event.start_time, dt(2024, 3, 3, 23, 0));
    }
}
