//! Calendar event types

use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{fold_key, set_if_present};

/// A calendar appointment
///
/// Wire names follow the existing client contract (`ID`, `StartTime`, ...).
/// `start_time <= end_time` is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "ID", alias = "id")]
    pub id: Uuid,
    /// Owner placeholder; never set by the server
    #[serde(rename = "UserID", alias = "user_id")]
    pub user_id: Uuid,
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    #[serde(rename = "StartTime", alias = "start_time")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "EndTime", alias = "end_time")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "Description", alias = "description")]
    pub description: String,
    /// Display color
    #[serde(rename = "Color", alias = "color")]
    pub color: String,
    #[serde(rename = "CreatedAt", alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt", alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event from a client payload.
    ///
    /// Fields missing from the payload keep their zero value. The id and both
    /// timestamps are assigned here.
    pub fn create(payload: EventPayload) -> Self {
        let mut event = Self::default();
        payload.apply_to(&mut event);
        let now = Utc::now();
        event.id = Uuid::new_v4();
        event.created_at = now;
        event.updated_at = now;
        event
    }

    /// Overlay a client payload onto this event and refresh `updated_at`.
    pub fn overlay(&mut self, payload: EventPayload) {
        payload.apply_to(self);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Client-supplied event fields
///
/// Every field is optional: an absent key or a `null` leaves the target field
/// as it was. Keys match regardless of case and underscores. `ID`,
/// `CreatedAt` and `UpdatedAt` are server-managed and ignored if sent, as is
/// any unknown key. A bare `null` body is an empty payload.
#[derive(Debug, Clone, Default)]
pub struct EventPayload {
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl<'de> Deserialize<'de> for EventPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = EventPayload;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an event object")
            }

            fn visit_unit<E: de::Error>(self) -> Result<EventPayload, E> {
                Ok(EventPayload::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<EventPayload, A::Error> {
                let mut p = EventPayload::default();
                while let Some(key) = map.next_key::<String>()? {
                    match fold_key(&key).as_str() {
                        "userid" => set_if_present(&mut p.user_id, map.next_value()?),
                        "title" => set_if_present(&mut p.title, map.next_value()?),
                        "starttime" => set_if_present(&mut p.start_time, map.next_value()?),
                        "endtime" => set_if_present(&mut p.end_time, map.next_value()?),
                        "description" => set_if_present(&mut p.description, map.next_value()?),
                        "color" => set_if_present(&mut p.color, map.next_value()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(p)
            }
        }

        deserializer.deserialize_any(PayloadVisitor)
    }
}

impl EventPayload {
    pub fn apply_to(self, event: &mut Event) {
        if let Some(user_id) = self.user_id {
            event.user_id = user_id;
        }
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = end_time;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(color) = self.color {
            event.color = color;
        }
    }
}
