//! High score persistence
//!
//! The game only needs one number. A missing or unreadable value counts as
//! "no high score yet" (0), never as an error.

/// Storage for the best score
pub trait HighScoreStore {
    fn high_score(&self) -> u64;
    fn set_high_score(&mut self, score: u64);
}

/// In-memory store, used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a high score
    pub fn with_high_score(score: u64) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }

    /// Number of `set_high_score` calls so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn high_score(&self) -> u64 {
        self.value.unwrap_or(0)
    }

    fn set_high_score(&mut self, score: u64) {
        self.value = Some(score);
        self.writes += 1;
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn high_score(&self) -> u64 {
        (**self).high_score()
    }

    fn set_high_score(&mut self, score: u64) {
        (**self).set_high_score(score);
    }
}

/// Parse a stored value; anything unreadable is 0
pub fn parse_high_score(raw: Option<&str>) -> u64 {
    raw.and_then(|s| serde_json::from_str::<u64>(s.trim()).ok())
        .unwrap_or(0)
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "highscore";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn high_score(&self) -> u64 {
        let raw = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let score = parse_high_score(raw.as_deref());
        log::info!("Loaded high score {}", score);
        score
    }

    fn set_high_score(&mut self, score: u64) {
        match Self::storage() {
            Some(storage) => {
                if storage
                    .set_item(Self::STORAGE_KEY, &score.to_string())
                    .is_err()
                {
                    log::warn!("Failed to save high score");
                }
            }
            None => log::warn!("No LocalStorage, high score not saved"),
        }
    }
}
