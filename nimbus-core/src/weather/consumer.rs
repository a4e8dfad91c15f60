//! Face-side weather consumer
//!
//! Holds the most recent snapshot seen on the channel. The cache is only
//! ever replaced whole, only from a reconciliation fetch or a change event
//! of the active session, and is kept across disconnects.

use super::payload::decode_snapshot;
use super::snapshot::WeatherSnapshot;
use crate::fmt::{debug, trace, warn};
use crate::sync::item::parse_path;
use crate::sync::{DataItem, DataPath, Session, SyncError};

/// Cache of the latest weather snapshot for one data path
#[derive(Debug, Clone)]
pub struct WeatherConsumer {
    path: DataPath,
    cache: Option<WeatherSnapshot>,
    session: Option<Session>,
}

impl WeatherConsumer {
    /// Create an empty, unsubscribed consumer for `path`
    pub fn new(path: &str) -> Result<Self, SyncError> {
        Ok(Self {
            path: parse_path(path)?,
            cache: None,
            session: None,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Latest snapshot, if one has ever been received
    pub fn current(&self) -> Option<&WeatherSnapshot> {
        self.cache.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.session.is_some()
    }

    /// Start accepting updates from `session`
    pub fn subscribe(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Stop accepting updates; the cache is retained
    pub fn unsubscribe(&mut self) {
        self.session = None;
    }

    fn accepts(&self, session: Session) -> bool {
        if self.session == Some(session) {
            true
        } else {
            trace!("ignoring update from session {}", session.0);
            false
        }
    }

    fn replace(&mut self, item: &DataItem) -> Result<bool, SyncError> {
        match decode_snapshot(&item.data) {
            Ok(snapshot) => {
                debug!("weather updated: code {}", snapshot.condition_code);
                self.cache = Some(snapshot);
                Ok(true)
            }
            Err(e) => {
                warn!("ignoring malformed weather payload ({} bytes)", item.data.len());
                Err(e)
            }
        }
    }

    /// Apply the reconciliation fetch made right after connecting
    ///
    /// Returns `Ok(true)` when the cache was replaced and a redraw is due.
    pub fn reconcile(&mut self, session: Session, items: &[DataItem]) -> Result<bool, SyncError> {
        if !self.accepts(session) {
            return Ok(false);
        }
        match items.iter().find(|item| item.path == self.path) {
            Some(item) => self.replace(item),
            None => {
                debug!("nothing published at {} yet", self.path.as_str());
                Ok(false)
            }
        }
    }

    /// Apply one change event
    ///
    /// Every accepted change warrants a redraw, even when the value did not
    /// change.
    pub fn apply_change(&mut self, session: Session, item: &DataItem) -> Result<bool, SyncError> {
        if !self.accepts(session) || item.path != self.path {
            return Ok(false);
        }
        self.replace(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::payload::encode_snapshot;
    use crate::weather::snapshot::DeciCelsius;

    fn snapshot(code: u16) -> WeatherSnapshot {
        WeatherSnapshot {
            condition_code: code,
            high: DeciCelsius(200),
            low: DeciCelsius(100),
            captured_at_ms: 5,
        }
    }

    fn item(path: &str, snapshot: &WeatherSnapshot) -> DataItem {
        DataItem::new(path, &encode_snapshot(snapshot).unwrap()).unwrap()
    }

    fn subscribed() -> WeatherConsumer {
        let mut consumer = WeatherConsumer::new("/forecast").unwrap();
        consumer.subscribe(Session(1));
        consumer
    }

    #[test]
    fn test_change_replaces_cache() {
        let mut consumer = subscribed();
        assert_eq!(consumer.apply_change(Session(1), &item("/forecast", &snapshot(800))), Ok(true));
        assert_eq!(consumer.apply_change(Session(1), &item("/forecast", &snapshot(500))), Ok(true));
        assert_eq!(consumer.current(), Some(&snapshot(500)));
    }

    #[test]
    fn test_identical_change_still_redraws() {
        let mut consumer = subscribed();
        let update = item("/forecast", &snapshot(800));
        assert_eq!(consumer.apply_change(Session(1), &update), Ok(true));
        let first = *consumer.current().unwrap();
        assert_eq!(consumer.apply_change(Session(1), &update), Ok(true));
        assert_eq!(consumer.current(), Some(&first));
    }

    #[test]
    fn test_other_path_ignored() {
        let mut consumer = subscribed();
        assert_eq!(consumer.apply_change(Session(1), &item("/alerts", &snapshot(800))), Ok(false));
        assert!(consumer.current().is_none());
    }

    #[test]
    fn test_stale_session_ignored() {
        let mut consumer = subscribed();
        consumer.subscribe(Session(2));
        assert_eq!(consumer.apply_change(Session(1), &item("/forecast", &snapshot(800))), Ok(false));
        assert!(consumer.current().is_none());
    }

    #[test]
    fn test_unsubscribed_ignores_and_retains() {
        let mut consumer = subscribed();
        consumer.apply_change(Session(1), &item("/forecast", &snapshot(800))).unwrap();
        consumer.unsubscribe();

        assert_eq!(consumer.apply_change(Session(1), &item("/forecast", &snapshot(200))), Ok(false));
        assert_eq!(consumer.current(), Some(&snapshot(800)));
    }

    #[test]
    fn test_malformed_keeps_cache() {
        let mut consumer = subscribed();
        consumer.apply_change(Session(1), &item("/forecast", &snapshot(800))).unwrap();

        let garbage = DataItem::new("/forecast", &[0xFF]).unwrap();
        assert_eq!(consumer.apply_change(Session(1), &garbage), Err(SyncError::MalformedPayload));
        assert_eq!(consumer.current(), Some(&snapshot(800)));
    }

    #[test]
    fn test_reconcile_picks_own_path() {
        let mut consumer = subscribed();
        let items = [item("/alerts", &snapshot(200)), item("/forecast", &snapshot(600))];
        assert_eq!(consumer.reconcile(Session(1), &items), Ok(true));
        assert_eq!(consumer.current(), Some(&snapshot(600)));
    }

    #[test]
    fn test_reconcile_empty_keeps_cache() {
        let mut consumer = subscribed();
        consumer.apply_change(Session(1), &item("/forecast", &snapshot(800))).unwrap();
        assert_eq!(consumer.reconcile(Session(1), &[]), Ok(false));
        assert_eq!(consumer.current(), Some(&snapshot(800)));
    }
}
