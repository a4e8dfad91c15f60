//! Display state machine
//!
//! Turns lifecycle events, sync notices and fired render ticks into state
//! changes plus a set of [`Effects`] for the platform adapter to carry out.
//! Nothing here performs I/O: the adapter owns the channel worker, the tick
//! timer and the time-zone listener.

use jiff::tz::Offset;

use crate::config::FaceConfig;
use crate::fmt::{debug, info, trace, warn};
use crate::scheduler::{RenderScheduler, TickCommand, TickOutcome, TickToken};
use crate::state::{DisplayState, FaceEvent, FaceState};
use crate::sync::{LinkCommand, Session, SyncError, SyncNotice};
use crate::weather::{WeatherConsumer, WeatherSnapshot};

/// Side effects requested by one state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Command for the sync worker
    pub link: Option<LinkCommand>,
    /// Command for the render-tick timer
    pub tick: Option<TickCommand>,
    /// Register (`true`) or unregister (`false`) the time-zone listener
    pub time_zone_listener: Option<bool>,
    /// Re-read the system time zone and pass it to [`DisplayStateMachine::set_time_zone`]
    pub refresh_time_zone: bool,
    /// Draw a new frame
    pub redraw: bool,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        *self == Effects::default()
    }
}

/// Face-side state: power state, display flags, weather cache and ticks
pub struct DisplayStateMachine {
    state: FaceState,
    display: DisplayState,
    consumer: WeatherConsumer,
    scheduler: RenderScheduler,
    session: Option<Session>,
    next_session: u32,
}

impl DisplayStateMachine {
    pub fn new(config: &FaceConfig) -> Result<Self, SyncError> {
        Ok(Self {
            state: FaceState::Hidden,
            display: DisplayState::new(),
            consumer: WeatherConsumer::new(&config.data_path)?,
            scheduler: RenderScheduler::new(config.interactive_period_ms),
            session: None,
            next_session: 0,
        })
    }

    pub fn state(&self) -> FaceState {
        self.state
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Cached snapshot to draw
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.consumer.current()
    }

    /// Session of the current visible period
    pub fn session(&self) -> Option<Session> {
        self.session
    }

    /// Store the system time zone after a refresh request
    pub fn set_time_zone(&mut self, offset: Offset) {
        self.display.time_zone = offset;
    }

    /// Handle a lifecycle event
    pub fn handle_event(&mut self, event: FaceEvent, now_ms: u64) -> Effects {
        let mut effects = Effects::default();

        match event {
            FaceEvent::VisibilityChanged(visible) => self.display.visible = visible,
            FaceEvent::AmbientChanged(ambient) => self.display.ambient = ambient,
            FaceEvent::TimeZoneChanged(offset) => {
                if self.state.is_visible() {
                    self.display.time_zone = offset;
                    effects.redraw = true;
                } else {
                    trace!("time zone change while hidden ignored");
                }
            }
            FaceEvent::TimeTick => {
                effects.redraw = self.state == FaceState::VisibleAmbient;
            }
            FaceEvent::PropertiesChanged { low_bit_ambient } => {
                self.display.low_bit_ambient = low_bit_ambient;
            }
        }

        let next = self.state.transition(&event, self.display.ambient);
        if next != self.state {
            self.enter(next, now_ms, &mut effects);
        }
        effects
    }

    fn enter(&mut self, next: FaceState, now_ms: u64, effects: &mut Effects) {
        let previous = self.state;
        self.state = next;
        debug!("face {:?} -> {:?}", previous, next);

        match (previous, next) {
            (FaceState::Hidden, _) => {
                self.next_session = self.next_session.wrapping_add(1);
                let session = Session(self.next_session);
                self.session = Some(session);
                self.consumer.subscribe(session);

                effects.link = Some(LinkCommand::Connect(session));
                effects.time_zone_listener = Some(true);
                effects.refresh_time_zone = true;
                effects.redraw = true;
                if next.ticks() {
                    effects.tick = Some(self.scheduler.start(now_ms));
                }
            }
            (_, FaceState::Hidden) => {
                self.consumer.unsubscribe();
                self.session = None;

                effects.link = Some(LinkCommand::Disconnect);
                effects.time_zone_listener = Some(false);
                effects.tick = self.scheduler.stop();
            }
            (_, FaceState::VisibleInteractive) => {
                effects.tick = Some(self.scheduler.start(now_ms));
                effects.redraw = true;
            }
            (_, FaceState::VisibleAmbient) => {
                effects.tick = self.scheduler.stop();
                effects.redraw = true;
            }
        }
    }

    /// Handle a notice from the sync worker
    pub fn handle_notice(&mut self, notice: SyncNotice) -> Effects {
        let mut effects = Effects::default();

        if !self.state.is_visible() || self.session != Some(notice.session()) {
            trace!("dropping notice from stale session {}", notice.session().0);
            return effects;
        }

        let applied = match &notice {
            SyncNotice::Reconciled { session, items } => self.consumer.reconcile(*session, items),
            SyncNotice::Changed { session, item } => self.consumer.apply_change(*session, item),
            SyncNotice::ConnectFailed { error, .. } => {
                info!("no weather this time: {:?}", error);
                Ok(false)
            }
            SyncNotice::ConnectionLost { error, .. } => {
                warn!("weather channel lost: {:?}, keeping cached data", error);
                Ok(false)
            }
        };

        // Malformed payloads are already logged and leave the cache alone
        effects.redraw = applied.unwrap_or(false);
        effects
    }

    /// Handle a fired render tick
    pub fn handle_tick(&mut self, token: TickToken, now_ms: u64) -> Effects {
        let mut effects = Effects::default();
        match self.scheduler.on_tick(token, now_ms, self.state.ticks()) {
            TickOutcome::Render(next) => {
                effects.tick = Some(next);
                effects.redraw = true;
            }
            TickOutcome::Stopped => debug!("late tick after leaving interactive mode"),
            TickOutcome::Ignored => trace!("stale tick ignored"),
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::RenderTick;
    use crate::sync::{DataItem, FetchResult};
    use crate::weather::payload::encode_snapshot;
    use crate::weather::DeciCelsius;

    fn machine() -> DisplayStateMachine {
        DisplayStateMachine::new(&FaceConfig::default()).unwrap()
    }

    fn snapshot(code: u16) -> WeatherSnapshot {
        WeatherSnapshot {
            condition_code: code,
            high: DeciCelsius(210),
            low: DeciCelsius(90),
            captured_at_ms: 0,
        }
    }

    fn item(code: u16) -> DataItem {
        DataItem::new("/forecast", &encode_snapshot(&snapshot(code)).unwrap()).unwrap()
    }

    fn scheduled(effects: &Effects) -> RenderTick {
        match effects.tick {
            Some(TickCommand::Schedule(tick)) => tick,
            other => panic!("expected a scheduled tick, got {:?}", other),
        }
    }

    fn connected_session(effects: &Effects) -> Session {
        match effects.link {
            Some(LinkCommand::Connect(session)) => session,
            other => panic!("expected connect, got {:?}", other),
        }
    }

    #[test]
    fn test_becoming_visible_connects_and_ticks() {
        let mut face = machine();
        let effects = face.handle_event(FaceEvent::VisibilityChanged(true), 12_345);

        assert_eq!(face.state(), FaceState::VisibleInteractive);
        connected_session(&effects);
        assert_eq!(effects.time_zone_listener, Some(true));
        assert!(effects.refresh_time_zone);
        assert!(effects.redraw);
        assert_eq!(scheduled(&effects).delay_ms, 655);
    }

    #[test]
    fn test_becoming_visible_in_ambient_does_not_tick() {
        let mut face = machine();
        face.handle_event(FaceEvent::AmbientChanged(true), 0);
        let effects = face.handle_event(FaceEvent::VisibilityChanged(true), 0);

        assert_eq!(face.state(), FaceState::VisibleAmbient);
        connected_session(&effects);
        assert_eq!(effects.tick, None);
    }

    #[test]
    fn test_hiding_releases_everything() {
        let mut face = machine();
        face.handle_event(FaceEvent::VisibilityChanged(true), 0);
        let effects = face.handle_event(FaceEvent::VisibilityChanged(false), 10);

        assert_eq!(face.state(), FaceState::Hidden);
        assert_eq!(effects.link, Some(LinkCommand::Disconnect));
        assert_eq!(effects.time_zone_listener, Some(false));
        assert_eq!(effects.tick, Some(TickCommand::Cancel));
        assert!(!effects.redraw);
        assert_eq!(face.session(), None);
    }

    #[test]
    fn test_ambient_toggle_keeps_channel() {
        let mut face = machine();
        face.handle_event(FaceEvent::VisibilityChanged(true), 0);

        let effects = face.handle_event(FaceEvent::AmbientChanged(true), 100);
        assert_eq!(effects.link, None);
        assert_eq!(effects.tick, Some(TickCommand::Cancel));
        assert!(effects.redraw);

        let effects = face.handle_event(FaceEvent::AmbientChanged(false), 200);
        assert_eq!(effects.link, None);
        assert_eq!(scheduled(&effects).delay_ms, 800);
        assert!(effects.redraw);
    }

    #[test]
    fn test_late_tick_after_hiding_is_ignored() {
        let mut face = machine();
        let effects = face.handle_event(FaceEvent::VisibilityChanged(true), 0);
        let tick = scheduled(&effects);

        face.handle_event(FaceEvent::VisibilityChanged(false), 500);
        let late = face.handle_tick(tick.token, 1_000);
        assert!(late.is_empty());
    }

    #[test]
    fn test_tick_redraws_and_reschedules() {
        let mut face = machine();
        let effects = face.handle_event(FaceEvent::VisibilityChanged(true), 0);
        let tick = scheduled(&effects);

        let fired = face.handle_tick(tick.token, 1_000);
        assert!(fired.redraw);
        assert_eq!(scheduled(&fired).due_ms, 2_000);
    }

    #[test]
    fn test_time_tick_redraws_only_in_ambient() {
        let mut face = machine();
        assert!(!face.handle_event(FaceEvent::TimeTick, 0).redraw);

        face.handle_event(FaceEvent::VisibilityChanged(true), 0);
        assert!(!face.handle_event(FaceEvent::TimeTick, 0).redraw);

        face.handle_event(FaceEvent::AmbientChanged(true), 0);
        assert!(face.handle_event(FaceEvent::TimeTick, 0).redraw);
    }

    #[test]
    fn test_time_zone_change() {
        let offset = Offset::constant(-5);
        let mut face = machine();

        let hidden = face.handle_event(FaceEvent::TimeZoneChanged(offset), 0);
        assert!(!hidden.redraw);
        assert_eq!(face.display().time_zone, Offset::UTC);

        face.handle_event(FaceEvent::VisibilityChanged(true), 0);
        let visible = face.handle_event(FaceEvent::TimeZoneChanged(offset), 0);
        assert!(visible.redraw);
        assert_eq!(face.display().time_zone, offset);
    }

    #[test]
    fn test_properties_recorded() {
        let mut face = machine();
        face.handle_event(FaceEvent::PropertiesChanged { low_bit_ambient: true }, 0);
        assert!(face.display().low_bit_ambient);
    }

    #[test]
    fn test_notices_update_cache() {
        let mut face = machine();
        let session = connected_session(&face.handle_event(FaceEvent::VisibilityChanged(true), 0));

        let mut items = FetchResult::new();
        items.push(item(800)).unwrap();
        let effects = face.handle_notice(SyncNotice::Reconciled { session, items });
        assert!(effects.redraw);
        assert_eq!(face.weather(), Some(&snapshot(800)));

        let effects = face.handle_notice(SyncNotice::Changed {
            session,
            item: item(500),
        });
        assert!(effects.redraw);
        assert_eq!(face.weather(), Some(&snapshot(500)));
    }

    #[test]
    fn test_stale_session_notice_dropped() {
        let mut face = machine();
        let first = connected_session(&face.handle_event(FaceEvent::VisibilityChanged(true), 0));
        face.handle_event(FaceEvent::VisibilityChanged(false), 0);
        let second = connected_session(&face.handle_event(FaceEvent::VisibilityChanged(true), 0));
        assert_ne!(first, second);

        let effects = face.handle_notice(SyncNotice::Changed {
            session: first,
            item: item(800),
        });
        assert!(!effects.redraw);
        assert_eq!(face.weather(), None);
    }

    #[test]
    fn test_notice_while_hidden_dropped() {
        let mut face = machine();
        let session = connected_session(&face.handle_event(FaceEvent::VisibilityChanged(true), 0));
        face.handle_event(FaceEvent::VisibilityChanged(false), 0);

        let effects = face.handle_notice(SyncNotice::Changed {
            session,
            item: item(800),
        });
        assert!(effects.is_empty());
        assert_eq!(face.weather(), None);
    }

    #[test]
    fn test_cache_survives_disconnect() {
        let mut face = machine();
        let session = connected_session(&face.handle_event(FaceEvent::VisibilityChanged(true), 0));
        face.handle_notice(SyncNotice::Changed {
            session,
            item: item(800),
        });

        let lost = face.handle_notice(SyncNotice::ConnectionLost {
            session,
            error: SyncError::ChannelUnavailable,
        });
        assert!(!lost.redraw);
        face.handle_event(FaceEvent::VisibilityChanged(false), 0);
        assert_eq!(face.weather(), Some(&snapshot(800)));
    }

    #[test]
    fn test_malformed_notice_keeps_cache() {
        let mut face = machine();
        let session = connected_session(&face.handle_event(FaceEvent::VisibilityChanged(true), 0));
        face.handle_notice(SyncNotice::Changed {
            session,
            item: item(800),
        });

        let garbage = DataItem::new("/forecast", &[0x00, 0x01]).unwrap();
        let effects = face.handle_notice(SyncNotice::Changed {
            session,
            item: garbage,
        });
        assert!(!effects.redraw);
        assert_eq!(face.weather(), Some(&snapshot(800)));
    }
}
