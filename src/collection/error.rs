use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    Load,
    Save,
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::Load => f.write_str("load"),
            SyncDirection::Save => f.write_str("sync"),
        }
    }
}

/// Every way a collection operation can fail. Each one is terminal for the call that
/// produced it; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("Stremio auth key not found. Please log in first.")]
    Auth,

    #[error("Failed to reach the collection API: {0}")]
    Network(String),

    #[error("Unexpected response from the collection API: {0}")]
    Protocol(String),

    #[error("Sync failed: {0}")]
    RemoteRejected(String),

    #[error("Addon index {index} is out of range (collection has {len} addons)")]
    Index { index: usize, len: usize },

    #[error("Catalog index {index} is out of range (manifest has {len} catalogs)")]
    CatalogIndex { index: usize, len: usize },

    #[error("Addon '{name}' at index {index} is protected and cannot be removed")]
    ProtectedEntry { index: usize, name: String },

    #[error("A {0} is already in progress")]
    SyncInFlight(SyncDirection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            CollectionError::RemoteRejected("quota exceeded".to_string()).to_string(),
            "Sync failed: quota exceeded"
        );
        assert_eq!(
            CollectionError::Index { index: 4, len: 3 }.to_string(),
            "Addon index 4 is out of range (collection has 3 addons)"
        );
        assert_eq!(
            CollectionError::SyncInFlight(SyncDirection::Save).to_string(),
            "A sync is already in progress"
        );
    }
}
