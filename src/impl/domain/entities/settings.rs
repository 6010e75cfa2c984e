use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LedgerSettings {
    /// Records requested per page by every list window.
    pub page_size: usize,
    pub search_debounce: Duration,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}
