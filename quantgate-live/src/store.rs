//! In-memory signal store. A mutex-guarded map stands in for the database
//! row locking a real deployment would use; the locking contract is the
//! same.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::collaborators::{SignalRecord, SignalStore};
use crate::record::{Signal, SignalKey};

#[derive(Debug, Default)]
pub struct MemorySignalStore {
    records: Mutex<HashMap<SignalKey, SignalRecord>>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SignalStore for MemorySignalStore {
    fn get_or_create(&self, signal: Signal) -> (Signal, bool) {
        let mut records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(existing) = records.get(&signal.key) {
            return (existing.signal.clone(), false);
        }
        let key = signal.key.clone();
        records.insert(key, SignalRecord::new(signal.clone()));
        (signal, true)
    }

    fn with_record(
        &self,
        key: &SignalKey,
        f: &mut dyn FnMut(&mut SignalRecord),
    ) -> Option<()> {
        let mut records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let record = records.get_mut(key)?;
        f(record);
        Some(())
    }

    fn get(&self, key: &SignalKey) -> Option<SignalRecord> {
        let records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.get(key).cloned()
    }
}
