use super::collection::CollectionId;

/// What a backup file holds, or what a restore wrote.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct BackupSummary {
    /// Record count per collection present in the file, in backup order.
    pub collections: Vec<(CollectionId, usize)>,
    /// Whether the firm profile is included.
    pub settings: bool,
}

impl BackupSummary {
    pub fn count(&self, collection: CollectionId) -> usize {
        self.collections
            .iter()
            .find(|(id, _)| *id == collection)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total_records(&self) -> usize {
        self.collections.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty() && !self.settings
    }
}
