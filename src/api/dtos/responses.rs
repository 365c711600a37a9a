use crate::domain::models::event::{Event, EventWithUsers, RepeatEndType, RepeatType};
use crate::domain::models::quote::MotivationalQuote;
use crate::domain::services::occurrences::Occurrence;
use crate::domain::services::timezone;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// The quote of the day, stripped of curation fields.
#[derive(Serialize)]
pub struct RandomQuoteResponse {
    pub id: i64,
    pub quote: String,
    pub author: Option<String>,
    pub times_shown: i32,
}

impl RandomQuoteResponse {
    pub fn from_quote(quote: &MotivationalQuote) -> Self {
        Self {
            id: quote.id,
            quote: quote.quote.clone(),
            author: quote.author.clone(),
            times_shown: quote.times_shown,
        }
    }
}

/// Event as the client sees it: timestamps translated into the client's
/// offset, expanded occurrences flagged with `is_repeat_instance` and the
/// base start they derive from.
#[derive(Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub user_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub all_day: bool,
    pub repeat_type: RepeatType,
    pub repeat_interval: i32,
    pub repeat_days: Option<String>,
    pub repeat_end_type: RepeatEndType,
    pub repeat_until: Option<NaiveDateTime>,
    pub repeat_count: Option<i32>,
    pub parent_event_id: Option<i64>,
    pub is_repeat_instance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_start: Option<NaiveDateTime>,
}

impl EventResponse {
    pub fn from_event(event: &Event, offset_minutes: Option<i64>) -> Self {
        Self::build(event, offset_minutes, false, None)
    }

    pub fn from_occurrence(occ: &Occurrence, offset_minutes: Option<i64>) -> Self {
        Self::build(&occ.event, offset_minutes, true, Some(occ.original_start))
    }

    fn build(
        event: &Event,
        offset_minutes: Option<i64>,
        is_repeat_instance: bool,
        original_start: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id: event.id,
            user_id: event.user_id,
            created_by: event.created_by,
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: timezone::to_local(event.start_time, offset_minutes),
            end_time: timezone::to_local(event.end_time, offset_minutes),
            all_day: event.all_day,
            repeat_type: event.repeat_type,
            repeat_interval: event.repeat_interval,
            repeat_days: event.repeat_days.clone(),
            repeat_end_type: event.repeat_end_type,
            repeat_until: event
                .repeat_until
                .map(|ts| timezone::to_local(ts, offset_minutes)),
            repeat_count: event.repeat_count,
            parent_event_id: event.parent_event_id,
            is_repeat_instance,
            original_start: original_start.map(|ts| timezone::to_local(ts, offset_minutes)),
        }
    }
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub creator_name: Option<String>,
}

impl EventDetailResponse {
    pub fn from_joined(row: &EventWithUsers, offset_minutes: Option<i64>) -> Self {
        Self {
            event: EventResponse::from_event(&row.event, offset_minutes),
            user_name: full_name(&row.user_first_name, &row.user_last_name),
            user_email: row.user_email.clone(),
            creator_name: full_name(&row.creator_first_name, &row.creator_last_name),
        }
    }
}

fn full_name(first: &Option<String>, last: &Option<String>) -> Option<String> {
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
        (Some(f), None) => Some(f.clone()),
        (None, Some(l)) => Some(l.clone()),
        (None, None) => None,
    }
}
