//! Last-writer-wins item store

use heapless::Vec;
use nimbus_protocol::RejectReason;

use super::item::DataItem;

/// Maximum number of distinct paths retained
pub const MAX_ITEMS: usize = 8;

/// Retained items, one per path
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    items: Vec<DataItem, MAX_ITEMS>,
}

impl DataStore {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Store `item`, replacing any item at the same path
    pub fn put(&mut self, item: DataItem) -> Result<(), RejectReason> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.path == item.path) {
            *existing = item;
            return Ok(());
        }
        self.items.push(item).map_err(|_| RejectReason::StoreFull)
    }

    /// Item currently stored at `path`
    pub fn get(&self, path: &str) -> Option<&DataItem> {
        self.items.iter().find(|i| i.path.as_str() == path)
    }

    /// Items whose path starts with `prefix`
    pub fn under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a DataItem> + 'a {
        self.items.iter().filter(move |i| i.is_under(prefix))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
