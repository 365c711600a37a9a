use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum RepeatType {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum RepeatEndType {
    Never,
    Date,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ExceptionType {
    Deleted,
    Modified,
}

/// A schedulable calendar item. `start_time`/`end_time`/`repeat_until` are
/// stored in UTC; conversion to the caller's local time happens at the API
/// boundary only.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: i64,
    /// Whose calendar the event appears on.
    pub user_id: i64,
    /// Who authored it; differs from `user_id` when a trainer schedules
    /// something for a client.
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub all_day: bool,
    pub repeat_type: RepeatType,
    pub repeat_interval: i32,
    /// Comma-separated weekday indices (0 = Monday), weekly events only.
    pub repeat_days: Option<String>,
    pub repeat_end_type: RepeatEndType,
    pub repeat_until: Option<NaiveDateTime>,
    pub repeat_count: Option<i32>,
    /// Set when this event continues a series that was split with a
    /// "this and future" edit.
    pub parent_event_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_type != RepeatType::None
    }

    /// The recurrence fields as a validated value object. Fails only on a
    /// malformed `repeat_days` string or missing termination field, which
    /// creation-time validation should have rejected.
    pub fn recurrence_rule(&self) -> Result<RecurrenceRule, String> {
        let weekdays = match (&self.repeat_days, self.repeat_type) {
            (Some(raw), RepeatType::Weekly) => Some(parse_repeat_days(raw)?),
            _ => None,
        };

        let end = match self.repeat_end_type {
            RepeatEndType::Never => RecurrenceEnd::Never,
            RepeatEndType::Date => {
                let until = self
                    .repeat_until
                    .ok_or_else(|| "repeat_end_type is 'date' but repeat_until is missing".to_string())?;
                RecurrenceEnd::Until(until)
            }
            RepeatEndType::Count => {
                let count = self
                    .repeat_count
                    .ok_or_else(|| "repeat_end_type is 'count' but repeat_count is missing".to_string())?;
                RecurrenceEnd::Count(count.max(1) as u32)
            }
        };

        Ok(RecurrenceRule {
            repeat_type: self.repeat_type,
            interval: self.repeat_interval.max(1) as i64,
            weekdays,
            end,
        })
    }
}

/// Parse a `repeat_days` string such as "0,2,4" into a weekday set
/// (0 = Monday .. 6 = Sunday).
pub fn parse_repeat_days(raw: &str) -> Result<BTreeSet<u8>, String> {
    let mut days = BTreeSet::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let day: u8 = part
            .parse()
            .map_err(|_| format!("Invalid weekday index '{}' in repeat_days", part))?;
        if day > 6 {
            return Err(format!("Weekday index {} out of range (0-6)", day));
        }
        days.insert(day);
    }
    if days.is_empty() {
        return Err("repeat_days must contain at least one weekday index".to_string());
    }
    Ok(days)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceEnd {
    Never,
    Until(NaiveDateTime),
    Count(u32),
}

/// How a base event repeats: frequency, interval, optional weekday subset and
/// termination condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub repeat_type: RepeatType,
    pub interval: i64,
    pub weekdays: Option<BTreeSet<u8>>,
    pub end: RecurrenceEnd,
}

impl RecurrenceRule {
    pub fn is_repeating(&self) -> bool {
        self.repeat_type != RepeatType::None
    }

    pub fn until(&self) -> Option<NaiveDateTime> {
        match self.end {
            RecurrenceEnd::Until(ts) => Some(ts),
            _ => None,
        }
    }

    /// The next occurrence start strictly after `ts`, assuming `ts` is itself
    /// an occurrence of the series. Month and year steps are calendar-correct
    /// (Jan 31 + 1 month lands on Feb 28/29, courtesy of `chrono::Months`).
    /// For weekly rules with an explicit weekday subset, stepping is
    /// day-granular within the allowed weekdays of the current week before
    /// jumping `interval` weeks ahead.
    pub fn next_after(&self, ts: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.repeat_type {
            RepeatType::None => None,
            RepeatType::Daily => ts.checked_add_signed(Duration::days(self.interval)),
            RepeatType::Weekly => match &self.weekdays {
                Some(days) => self.next_weekday_after(ts, days),
                None => ts.checked_add_signed(Duration::weeks(self.interval)),
            },
            RepeatType::Monthly => ts.checked_add_months(Months::new(self.interval as u32)),
            RepeatType::Yearly => ts.checked_add_months(Months::new(12 * self.interval as u32)),
        }
    }

    fn next_weekday_after(&self, ts: NaiveDateTime, days: &BTreeSet<u8>) -> Option<NaiveDateTime> {
        let time = ts.time();
        let date = ts.date();
        let dow = date.weekday().num_days_from_monday() as u8;

        // Remaining allowed days in the current week.
        for candidate in (dow + 1)..7 {
            if days.contains(&candidate) {
                return Some((date + Duration::days((candidate - dow) as i64)).and_time(time));
            }
        }

        // Jump to the first allowed day of the next on-cycle week.
        let monday = date - Duration::days(dow as i64);
        let next_week = monday.checked_add_signed(Duration::weeks(self.interval))?;
        let first = *days.iter().next()?;
        Some((next_week + Duration::days(first as i64)).and_time(time))
    }
}

/// A per-date override on one concrete occurrence of a repeating event.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventException {
    pub id: i64,
    pub event_id: i64,
    pub exception_date: NaiveDate,
    pub exception_type: ExceptionType,
    /// Points at the standalone replacement event iff type is `modified`.
    pub modified_event_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Audit record linking a source event to a duplicate placed on another
/// user's calendar.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventCopy {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
}

/// An event joined with owner and creator display names, for the detail view.
#[derive(Debug, FromRow)]
pub struct EventWithUsers {
    #[sqlx(flatten)]
    pub event: Event,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub user_email: Option<String>,
    pub creator_first_name: Option<String>,
    pub creator_last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn parse_repeat_days_accepts_valid_sets() {
        let days = parse_repeat_days("0,2,4").unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn parse_repeat_days_rejects_out_of_range() {
        assert!(parse_repeat_days("1,7").is_err());
        assert!(parse_repeat_days("mon").is_err());
        assert!(parse_repeat_days("").is_err());
    }

    #[test]
    fn monthly_step_is_calendar_correct() {
        let rule = RecurrenceRule {
            repeat_type: RepeatType::Monthly,
            interval: 1,
            weekdays: None,
            end: RecurrenceEnd::Never,
        };
        // One month after Jan 31 clamps to the end of February.
        let next = rule.next_after(dt(2024, 1, 31, 9, 0)).unwrap();
        assert_eq!(next, dt(2024, 2, 29, 9, 0));
    }

    #[test]
    fn yearly_step_handles_leap_day() {
        let rule = RecurrenceRule {
            repeat_type: RepeatType::Yearly,
            interval: 1,
            weekdays: None,
            end: RecurrenceEnd::Never,
        };
        let next = rule.next_after(dt(2024, 2, 29, 12, 0)).unwrap();
        assert_eq!(next, dt(2025, 2, 28, 12, 0));
    }

    #[test]
    fn weekly_with_days_steps_within_week_then_jumps_cycle() {
        let rule = RecurrenceRule {
            repeat_type: RepeatType::Weekly,
            interval: 2,
            weekdays: Some([0u8, 4u8].into_iter().collect()),
            end: RecurrenceEnd::Never,
        };
        // 2024-03-04 is a Monday.
        let mon = dt(2024, 3, 4, 8, 0);
        let fri = rule.next_after(mon).unwrap();
        assert_eq!(fri, dt(2024, 3, 8, 8, 0));
        // After Friday the next allowed day is Monday two weeks out.
        let next_mon = rule.next_after(fri).unwrap();
        assert_eq!(next_mon, dt(2024, 3, 18, 8, 0));
    }
}
