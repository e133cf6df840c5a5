//! Ledger entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{calendar::DayCalendar, catalog::TicketType};

/// Ticket identifier: issuance epoch milliseconds plus a batch offset, as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_sequence(sequence: i64) -> Self {
        Self(sequence.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of time-derived ids; `None` for foreign ids.
    pub fn sequence(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TicketId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One issued ticket. Field names match the persisted snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    #[serde(rename = "type")]
    pub type_id: String,
    /// Copied from the catalog at issuance.
    pub type_name: String,
    pub price: u64,
    /// Issuance instant in epoch milliseconds.
    pub timestamp: i64,
    /// Day key, computed once at issuance.
    pub date: String,
    pub time: String,
    /// Calendar that produced `date`/`time`; absent on legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,
}

impl Ticket {
    pub fn issue(
        id: TicketId,
        ticket_type: &TicketType,
        price: u64,
        issued_at: DateTime<Utc>,
        calendar: &DayCalendar,
    ) -> Self {
        let stamp = calendar.stamp(issued_at);
        Self {
            id,
            type_id: ticket_type.id.clone(),
            type_name: ticket_type.name.clone(),
            price,
            timestamp: issued_at.timestamp_millis(),
            date: stamp.date,
            time: stamp.time,
            calendar: Some(calendar.id()),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    pub fn is_on(&self, date: &str) -> bool {
        self.date == date
    }
}
