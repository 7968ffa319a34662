use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::Result;
use crate::types::null_as_default;

/// Notification of something happening to a resource, e.g.
/// `PAYIN_NORMAL_SUCCEEDED` for a pay-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Event {
    #[serde(deserialize_with = "null_as_default")]
    pub resource_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_type: String,
    /// Unix timestamp.
    pub date: i64,
}

impl Event {
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.date, 0).single()
    }
}

/// Narrows `events` to a type and/or a time window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

impl EventFilter {
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn before(mut self, date: DateTime<Utc>) -> Self {
        self.before = Some(date);
        self
    }

    pub fn after(mut self, date: DateTime<Utc>) -> Self {
        self.after = Some(date);
        self
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(event_type) = &self.event_type {
            query.push(("EventType".to_string(), event_type.clone()));
        }
        if let Some(before) = self.before {
            query.push(("BeforeDate".to_string(), before.timestamp().to_string()));
        }
        if let Some(after) = self.after {
            query.push(("AfterDate".to_string(), after.timestamp().to_string()));
        }
        query
    }
}

impl MangoPay {
    pub fn events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        self.list_filtered(Action::Events, Default::default(), &filter.to_query())
    }

    pub async fn async_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        self.async_list_filtered(Action::Events, Default::default(), &filter.to_query())
            .await
    }
}
