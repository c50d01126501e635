//! UI preferences

use tracing::warn;

use crate::error::Result;
use crate::models::Theme;
use crate::storage::{KeyValueStore, THEME_KEY};

/// Stored theme; `light` when unset, unreadable or unrecognised.
/// The value is kept as a bare string, not JSON.
pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring stored theme");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read theme");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str())
}
