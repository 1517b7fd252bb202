//! Per-level best results
//!
//! Persisted to LocalStorage, one entry per cleared level: fewest moves,
//! ties broken by elapsed time.

use serde::{Deserialize, Serialize};

/// Best recorded clear of one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestEntry {
    /// 1-based level number
    pub level: u32,
    /// Moves used for the clear
    pub moves: u32,
    /// Elapsed seconds at the clear
    pub secs: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Best-result table across all levels
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestResults {
    pub entries: Vec<BestEntry>,
}

impl BestResults {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tumbler_best_results";

    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Best recorded clear for a level, if any
    pub fn best_for(&self, level: u32) -> Option<&BestEntry> {
        self.entries.iter().find(|e| e.level == level)
    }

    /// Would this clear improve on the recorded best?
    pub fn qualifies(&self, level: u32, moves: u32, secs: u32) -> bool {
        match self.best_for(level) {
            None => true,
            Some(best) => moves < best.moves || (moves == best.moves && secs < best.secs),
        }
    }

    /// Record a level clear. Returns true if it became the new best.
    pub fn record(&mut self, level: u32, moves: u32, secs: u32, timestamp: f64) -> bool {
        if !self.qualifies(level, moves, secs) {
            return false;
        }
        let entry = BestEntry {
            level,
            moves,
            secs,
            timestamp,
        };
        match self.entries.iter().position(|e| e.level == level) {
            Some(i) => self.entries[i] = entry,
            None => {
                self.entries.push(entry);
                self.entries.sort_by_key(|e| e.level);
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load best results from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(results) = serde_json::from_str::<BestResults>(&json) {
                    log::info!("Loaded {} best results", results.entries.len());
                    return results;
                }
            }
        }

        log::info!("No best results found, starting fresh");
        Self::new()
    }

    /// Save best results to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best results saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_clear_always_records() {
        let mut results = BestResults::new();
        assert!(results.record(1, 20, 45, 0.0));
        assert_eq!(results.best_for(1).unwrap().moves, 20);
    }

    #[test]
    fn test_fewer_moves_beats_more() {
        let mut results = BestResults::new();
        results.record(1, 20, 45, 0.0);
        assert!(results.record(1, 15, 60, 1.0));
        assert!(!results.record(1, 18, 10, 2.0));
        assert_eq!(results.best_for(1).unwrap().moves, 15);
    }

    #[test]
    fn test_time_breaks_move_ties() {
        let mut results = BestResults::new();
        results.record(2, 20, 45, 0.0);
        assert!(results.record(2, 20, 30, 1.0));
        assert_eq!(results.best_for(2).unwrap().secs, 30);
    }

    #[test]
    fn test_levels_tracked_independently() {
        let mut results = BestResults::new();
        results.record(2, 30, 90, 0.0);
        results.record(1, 12, 25, 1.0);
        assert_eq!(results.entries[0].level, 1);
        assert_eq!(results.entries[1].level, 2);
        assert!(results.best_for(3).is_none());
    }
}
