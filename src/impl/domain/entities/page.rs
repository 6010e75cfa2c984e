use super::document::Cursor;

#[derive(Debug, Clone)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub cursor: Option<Cursor>,
    /// True iff the page came back with exactly the requested number of
    /// records. The only hint that more records may follow.
    pub is_full: bool,
}

#[derive(Debug, Clone)]
pub struct WindowState<R> {
    pub data: Vec<R>,
    pub cursor: Option<Cursor>,
    pub loading: bool,
    pub has_more: bool,
    pub index_error: bool,
}

impl<R> Default for WindowState<R> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            cursor: None,
            loading: false,
            has_more: true,
            index_error: false,
        }
    }
}
