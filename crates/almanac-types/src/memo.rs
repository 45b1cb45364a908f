//! Memo types

use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{fold_key, set_if_present};

/// A free-form note, optionally pinned to a calendar date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(rename = "ID", alias = "id")]
    pub id: Uuid,
    #[serde(rename = "UserID", alias = "user_id")]
    pub user_id: Uuid,
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    #[serde(rename = "Content", alias = "content")]
    pub content: String,
    #[serde(rename = "LinkedDate", alias = "linked_date")]
    pub linked_date: Option<DateTime<Utc>>,
    /// Color used when the memo is shown on the shelf
    #[serde(rename = "ThemeColor", alias = "theme_color")]
    pub theme_color: String,
    #[serde(rename = "CreatedAt", alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt", alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl Memo {
    pub fn create(payload: MemoPayload) -> Self {
        let mut memo = Self::default();
        payload.apply_to(&mut memo);
        let now = Utc::now();
        memo.id = Uuid::new_v4();
        memo.created_at = now;
        memo.updated_at = now;
        memo
    }

    pub fn overlay(&mut self, payload: MemoPayload) {
        payload.apply_to(self);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Client-supplied memo fields
///
/// `LinkedDate` is the only nullable field: sending `null` unlinks the memo,
/// leaving the key out keeps the current date. Keys match regardless of case
/// and underscores.
#[derive(Debug, Clone, Default)]
pub struct MemoPayload {
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the link
    pub linked_date: Option<Option<DateTime<Utc>>>,
    pub theme_color: Option<String>,
}

impl<'de> Deserialize<'de> for MemoPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = MemoPayload;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a memo object")
            }

            fn visit_unit<E: de::Error>(self) -> Result<MemoPayload, E> {
                Ok(MemoPayload::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MemoPayload, A::Error> {
                let mut p = MemoPayload::default();
                while let Some(key) = map.next_key::<String>()? {
                    match fold_key(&key).as_str() {
                        "userid" => set_if_present(&mut p.user_id, map.next_value()?),
                        "title" => set_if_present(&mut p.title, map.next_value()?),
                        "content" => set_if_present(&mut p.content, map.next_value()?),
                        "linkeddate" => p.linked_date = Some(map.next_value()?),
                        "themecolor" => set_if_present(&mut p.theme_color, map.next_value()?),
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

impl MemoPayload {
    pub fn apply_to(self, memo: &mut Memo) {
        if let Some(user_id) = self.user_id {
            memo.user_id = user_id;
        }
        if let Some(title) = self.title {
            memo.title = title;
        }
        if let Some(content) = self.content {
            memo.content = content;
        }
        if let Some(linked_date) = self.linked_date {
            memo.linked_date = linked_date;
        }
        if let Some(theme_color) = self.theme_color {
            memo.theme_color = theme_color;
        }
    }
}
