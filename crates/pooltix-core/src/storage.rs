use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use pooltix_domain::{Catalog, DayCalendar, Ticket};

use crate::CoreError;

/// Storage key holding the serialized ledger.
pub const TICKETS_KEY: &str = "tickets";

/// Key-value persistence contract consumed by the ledger store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// In-process store. Clones share the same entries, which lets tests reopen a
/// ledger against the "same device".
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set`/`remove` fail until switched back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("memory store is read-only".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.check_writable()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Detects duplicate ids, dangling type references and calendar drift within a
/// ledger snapshot.
pub fn ledger_warnings(
    tickets: &[Ticket],
    catalog: &Catalog,
    calendar: &DayCalendar,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let calendar_id = calendar.id();
    let mut warnings = Vec::new();

    for ticket in tickets {
        if !seen.insert(&ticket.id) {
            warnings.push(format!("ticket id {} appears more than once", ticket.id));
        }
        if !catalog.contains(&ticket.type_id) {
            warnings.push(format!(
                "ticket {} references unknown type `{}`",
                ticket.id, ticket.type_id
            ));
        }
        if let Some(stamped) = ticket.calendar.as_deref() {
            if stamped != calendar_id {
                warnings.push(format!(
                    "ticket {} was dated with calendar `{}` (configured `{}`)",
                    ticket.id, stamped, calendar_id
                ));
            }
        }
    }
    warnings
}
