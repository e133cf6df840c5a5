//! Owner of the issued-ticket ledger and its persisted snapshot.

use std::sync::Arc;

use pooltix_domain::{DayCalendar, Ticket, TicketId, TicketType};
use tracing::{debug, error, info, warn};

use crate::{
    storage::{KeyValueStore, TICKETS_KEY},
    time::Clock,
    CoreError,
};

/// Exclusive owner of the ticket list.
///
/// Every mutation serializes the complete next ledger and writes it under one
/// key before the in-memory list is replaced, so a failed write leaves the
/// store exactly as it was.
pub struct LedgerStore {
    tickets: Vec<Ticket>,
    storage: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    calendar: DayCalendar,
    key: String,
    last_sequence: i64,
}

impl LedgerStore {
    /// Opens the ledger under [`TICKETS_KEY`], loading any prior snapshot.
    pub fn open(
        storage: Box<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        calendar: DayCalendar,
    ) -> Self {
        Self::open_at(storage, TICKETS_KEY, clock, calendar)
    }

    pub fn open_at(
        storage: Box<dyn KeyValueStore>,
        key: impl Into<String>,
        clock: Arc<dyn Clock>,
        calendar: DayCalendar,
    ) -> Self {
        let mut store = Self {
            tickets: Vec::new(),
            storage,
            clock,
            calendar,
            key: key.into(),
            last_sequence: 0,
        };
        store.load();
        store
    }

    /// Re-reads the persisted snapshot. Missing or unreadable snapshots yield an
    /// empty ledger; the failure is logged, never returned.
    pub fn load(&mut self) -> &[Ticket] {
        self.tickets = load_snapshot(self.storage.as_ref(), &self.key);
        let highest = self
            .tickets
            .iter()
            .filter_map(|ticket| ticket.id.sequence())
            .max()
            .unwrap_or(0);
        self.last_sequence = self.last_sequence.max(highest);
        &self.tickets
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| &ticket.id == id)
    }

    pub fn calendar(&self) -> &DayCalendar {
        &self.calendar
    }

    /// Today's day key, recomputed from the clock on every call.
    pub fn today(&self) -> String {
        self.calendar.date_key(self.clock.now())
    }

    pub fn count_on(&self, date: &str) -> usize {
        self.tickets.iter().filter(|ticket| ticket.is_on(date)).count()
    }

    /// Newest `limit` tickets, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&Ticket> {
        self.tickets.iter().rev().take(limit).collect()
    }

    /// Issues `quantity` tickets of one type at an already-resolved unit price.
    ///
    /// Ids are `max(now_ms, last_id + 1) + offset`, so tickets issued within the
    /// same millisecond (or after a clock step backwards) never collide.
    pub fn append(
        &mut self,
        ticket_type: &TicketType,
        unit_price: u64,
        quantity: u32,
    ) -> Result<&[Ticket], CoreError> {
        if quantity == 0 {
            return Err(CoreError::Validation(
                "quantity must be at least 1".into(),
            ));
        }

        let issued_at = self.clock.now();
        let exhausted = || CoreError::IdsExhausted(self.last_sequence);
        let base = issued_at
            .timestamp_millis()
            .max(self.last_sequence.checked_add(1).ok_or_else(exhausted)?);
        let last = base
            .checked_add(i64::from(quantity) - 1)
            .ok_or_else(exhausted)?;

        let mut next = Vec::with_capacity(self.tickets.len() + quantity as usize);
        next.extend_from_slice(&self.tickets);
        for offset in 0..i64::from(quantity) {
            next.push(Ticket::issue(
                TicketId::from_sequence(base + offset),
                ticket_type,
                unit_price,
                issued_at,
                &self.calendar,
            ));
        }

        self.persist(&next, "issue tickets")?;
        self.tickets = next;
        self.last_sequence = last;
        info!(
            ticket_type = %ticket_type.id,
            quantity,
            unit_price,
            "issued tickets"
        );
        Ok(&self.tickets)
    }

    /// Removes the ticket with `id`. Absent ids are a no-op and trigger no write.
    pub fn remove_by_id(&mut self, id: &TicketId) -> Result<&[Ticket], CoreError> {
        let Some(position) = self.tickets.iter().position(|ticket| &ticket.id == id) else {
            debug!(%id, "remove skipped, ticket not present");
            return Ok(&self.tickets);
        };

        let mut next = self.tickets.clone();
        next.remove(position);
        self.persist(&next, "delete the ticket")?;
        self.tickets = next;
        info!(%id, "removed ticket");
        Ok(&self.tickets)
    }

    /// Removes every ticket whose day key satisfies `predicate` and reports how
    /// many went.
    pub fn remove_where<F>(&mut self, predicate: F) -> Result<(&[Ticket], usize), CoreError>
    where
        F: Fn(&str) -> bool,
    {
        let (removed, kept): (Vec<Ticket>, Vec<Ticket>) = self
            .tickets
            .iter()
            .cloned()
            .partition(|ticket| predicate(&ticket.date));
        let removed_count = removed.len();
        if removed_count == 0 {
            return Ok((&self.tickets, 0));
        }

        self.persist(&kept, "delete tickets")?;
        self.tickets = kept;
        info!(removed = removed_count, remaining = self.tickets.len(), "removed tickets by date");
        Ok((&self.tickets, removed_count))
    }

    pub fn remove_on(&mut self, date: &str) -> Result<(&[Ticket], usize), CoreError> {
        self.remove_where(|ticket_date| ticket_date == date)
    }

    /// Drops every ticket and deletes the persisted snapshot itself.
    pub fn clear(&mut self) -> Result<&[Ticket], CoreError> {
        self.storage.remove(&self.key).map_err(|err| {
            error!(key = %self.key, error = %err, "failed to remove ledger snapshot");
            CoreError::Persistence {
                operation: "clear the ledger",
                reason: err.to_string(),
            }
        })?;
        let dropped = self.tickets.len();
        self.tickets.clear();
        info!(dropped, "cleared ledger");
        Ok(&self.tickets)
    }

    /// Replaces the whole ledger with a serialized snapshot, such as a backup.
    ///
    /// The payload is parsed before anything is written; an unreadable payload
    /// is rejected and the current ledger stays in place.
    pub fn restore_from(&mut self, payload: &str) -> Result<&[Ticket], CoreError> {
        let next: Vec<Ticket> =
            serde_json::from_str(payload).map_err(|err| CoreError::Serde(err.to_string()))?;
        self.persist(&next, "restore the ledger")?;
        let highest = next
            .iter()
            .filter_map(|ticket| ticket.id.sequence())
            .max()
            .unwrap_or(0);
        self.last_sequence = self.last_sequence.max(highest);
        self.tickets = next;
        info!(restored = self.tickets.len(), "restored ledger snapshot");
        Ok(&self.tickets)
    }

    fn persist(&self, tickets: &[Ticket], operation: &'static str) -> Result<(), CoreError> {
        let payload = serde_json::to_string(tickets).map_err(|err| CoreError::Persistence {
            operation,
            reason: err.to_string(),
        })?;
        self.storage.set(&self.key, &payload).map_err(|err| {
            error!(key = %self.key, error = %err, "failed to persist ledger");
            CoreError::Persistence {
                operation,
                reason: err.to_string(),
            }
        })
    }
}

/// Reads the snapshot stored under `key`, degrading to an empty ledger.
pub fn load_snapshot(storage: &dyn KeyValueStore, key: &str) -> Vec<Ticket> {
    let payload = match storage.get(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "could not read ledger snapshot, starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&payload) {
        Ok(tickets) => tickets,
        Err(err) => {
            warn!(key, error = %err, "ledger snapshot is unreadable, starting empty");
            Vec::new()
        }
    }
}
