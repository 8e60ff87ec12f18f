use crate::storage::{KeyValueStore, StorageError};

/// Shown when no best time has been recorded
pub const BEST_TIME_PLACEHOLDER: &str = "--";

/// Lowest completion time ever recorded, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestTime(Option<u64>);

impl BestTime {
    pub fn get(&self) -> Option<u64> {
        self.0
    }

    /// Decode a stored decimal string; anything malformed reads as unset
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(secs) => BestTime(Some(secs)),
            Err(_) => {
                log::warn!("Ignoring malformed best time {:?}", raw);
                BestTime(None)
            }
        }
    }

    /// Read from the store under `key`
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Self {
        store
            .get(key)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    /// Does `candidate` beat the record?
    pub fn is_beaten_by(&self, candidate: u64) -> bool {
        self.0.is_none_or(|best| candidate < best)
    }

    /// Take `candidate` if it is a new record. Returns true if it was.
    pub fn record(&mut self, candidate: u64) -> bool {
        if !self.is_beaten_by(candidate) {
            return false;
        }
        self.0 = Some(candidate);
        true
    }

    pub fn save(&self, store: &mut dyn KeyValueStore, key: &str) -> Result<(), StorageError> {
        match self.0 {
            Some(secs) => store.set(key, &secs.to_string()),
            None => Ok(()),
        }
    }

    /// Display text: the seconds, or the placeholder
    pub fn label(&self) -> String {
        match self.0 {
            Some(secs) => secs.to_string(),
            None => BEST_TIME_PLACEHOLDER.to_string(),
        }
    }
}
