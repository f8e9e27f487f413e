//! Host storage boundary for the desktop shell.
//!
//! The shell persists exactly one durable scalar per game: its high score.
//! On wasm targets the backing store is `localStorage`; elsewhere an
//! in-process map stands in so the store contract stays testable off-browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

#[cfg(not(target_arch = "wasm32"))]
use std::{cell::RefCell, collections::HashMap};

const HIGH_SCORE_KEY_PREFIX: &str = "glitchdesk.highscore.";

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static LOCAL_PREFS: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Reads a raw string value from the host key/value store.
pub fn load_raw(key: &str) -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        local_storage()?.get_item(key).ok().flatten()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        LOCAL_PREFS.with(|prefs| prefs.borrow().get(key).cloned())
    }
}

/// Writes a raw string value to the host key/value store.
pub fn store_raw(key: &str, value: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let storage = local_storage().ok_or_else(|| "local storage unavailable".to_string())?;
        storage
            .set_item(key, value)
            .map_err(|_| format!("failed to persist key `{key}`"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        LOCAL_PREFS.with(|prefs| {
            prefs.borrow_mut().insert(key.to_string(), value.to_string());
        });
        Ok(())
    }
}

fn high_score_key(game_id: &str) -> String {
    format!("{HIGH_SCORE_KEY_PREFIX}{game_id}")
}

/// Loads the stored high score for `game_id`, if any.
///
/// A malformed stored value is reported and treated as absent.
pub fn load_high_score(game_id: &str) -> Option<u32> {
    let raw = load_raw(&high_score_key(game_id))?;
    match raw.parse::<u32>() {
        Ok(score) => Some(score),
        Err(err) => {
            leptos::logging::warn!("discarding malformed high score for `{game_id}`: {err}");
            None
        }
    }
}

/// Records `score` for `game_id` when it beats the stored value.
///
/// Returns `true` only when a new high score was written. Storage failures
/// are reported and swallowed; a high score is never worth failing a game
/// over.
pub fn record_high_score(game_id: &str, score: u32) -> bool {
    let current = load_high_score(game_id).unwrap_or(0);
    if score <= current {
        return false;
    }
    match store_raw(&high_score_key(game_id), &score.to_string()) {
        Ok(()) => true,
        Err(err) => {
            leptos::logging::warn!("high score persist failed for `{game_id}`: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn high_score_written_only_on_improvement() {
        let game = "test.improvement";
        assert_eq!(load_high_score(game), None);

        assert!(record_high_score(game, 400));
        assert_eq!(load_high_score(game), Some(400));

        assert!(!record_high_score(game, 400));
        assert!(!record_high_score(game, 250));
        assert_eq!(load_high_score(game), Some(400));

        assert!(record_high_score(game, 900));
        assert_eq!(load_high_score(game), Some(900));
    }

    #[test]
    fn zero_score_never_persists() {
        let game = "test.zero";
        assert!(!record_high_score(game, 0));
        assert_eq!(load_high_score(game), None);
    }

    #[test]
    fn malformed_stored_value_is_discarded() {
        let game = "test.malformed";
        store_raw(&high_score_key(game), "not-a-number").expect("store raw");
        assert_eq!(load_high_score(game), None);
        assert!(record_high_score(game, 10));
        assert_eq!(load_high_score(game), Some(10));
    }
}
