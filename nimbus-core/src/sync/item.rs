//! Synchronized items and their paths

use heapless::{String, Vec};
use nimbus_protocol::{is_valid_path, MAX_DATA_LEN, MAX_PATH_LEN};

use super::channel::SyncError;

/// Key of one synchronized item, e.g. `/forecast`
pub type DataPath = String<MAX_PATH_LEN>;

/// Opaque item contents
pub type ItemData = Vec<u8, MAX_DATA_LEN>;

/// Parse and validate a path or prefix
pub fn parse_path(path: &str) -> Result<DataPath, SyncError> {
    if !is_valid_path(path) {
        return Err(SyncError::InvalidPath);
    }
    let mut parsed = DataPath::new();
    parsed.push_str(path).map_err(|_| SyncError::InvalidPath)?;
    Ok(parsed)
}

/// The unit carried by the channel: one path and its current data
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataItem {
    pub path: DataPath,
    pub data: ItemData,
}

impl DataItem {
    /// Build an item, validating the path and the data size
    pub fn new(path: &str, data: &[u8]) -> Result<Self, SyncError> {
        let path = parse_path(path)?;
        let data = Vec::from_slice(data).map_err(|_| SyncError::PayloadTooLarge)?;
        Ok(Self { path, data })
    }

    /// Check whether this item lives under `prefix`
    pub fn is_under(&self, prefix: &str) -> bool {
        self.path.starts_with(prefix)
    }
}
