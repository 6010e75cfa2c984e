use std::time::Duration;

use crate::entities::{LedgerSettings, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE_MS};

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct LedgerSettingsModel {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for LedgerSettingsModel {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl From<LedgerSettingsModel> for LedgerSettings {
    fn from(m: LedgerSettingsModel) -> Self {
        LedgerSettings {
            page_size: m.page_size,
            search_debounce: Duration::from_millis(m.search_debounce_ms),
        }
    }
}
