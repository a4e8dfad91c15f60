//! I/O-context sync worker
//!
//! The worker owns the face's channel handle. It connects on request,
//! subscribes before the reconciliation fetch so no change can fall between
//! the two, and then streams changes. Everything it learns goes back to the
//! render context as a [`SyncNotice`] tagged with the session that asked
//! for it; it never touches display state itself.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::Duration;

use super::channel::{ConnectionState, DataSyncChannel, FetchResult, SyncError};
use super::item::{DataItem, DataPath};
use crate::fmt::{debug, info, warn};

/// Identifies one connect request from the display state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session(pub u32);

/// Command from the render context to the sync worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkCommand {
    /// Connect, subscribe and reconcile on behalf of `Session`
    Connect(Session),
    /// Drop the subscription and the connection
    Disconnect,
}

/// Result of sync work, posted back to the render context
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncNotice {
    /// Reconciliation fetch finished after connecting
    Reconciled { session: Session, items: FetchResult },
    /// A subscribed item changed
    Changed { session: Session, item: DataItem },
    /// Connect, subscribe or fetch failed; no data this time
    ConnectFailed { session: Session, error: SyncError },
    /// An established connection went away
    ConnectionLost { session: Session, error: SyncError },
}

impl SyncNotice {
    /// Session this notice belongs to
    pub fn session(&self) -> Session {
        match self {
            SyncNotice::Reconciled { session, .. }
            | SyncNotice::Changed { session, .. }
            | SyncNotice::ConnectFailed { session, .. }
            | SyncNotice::ConnectionLost { session, .. } => *session,
        }
    }
}

/// Drives a [`DataSyncChannel`] from [`LinkCommand`]s
pub struct SyncWorker<C> {
    channel: C,
    path: DataPath,
    connect_timeout: Duration,
    session: Option<Session>,
    streaming: bool,
}

impl<C: DataSyncChannel> SyncWorker<C> {
    pub fn new(channel: C, path: DataPath, connect_timeout: Duration) -> Self {
        Self {
            channel,
            path,
            connect_timeout,
            session: None,
            streaming: false,
        }
    }

    /// Session currently being served, if any
    pub fn session(&self) -> Option<Session> {
        self.session
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.channel.state()
    }

    /// Serve commands forever
    pub async fn run<M: RawMutex, const C_N: usize, const N_N: usize>(
        &mut self,
        commands: Receiver<'_, M, LinkCommand, C_N>,
        notices: Sender<'_, M, SyncNotice, N_N>,
    ) -> ! {
        info!("sync worker started for {}", self.path.as_str());
        let mut pending: Option<LinkCommand> = None;
        loop {
            let command = match pending.take() {
                Some(command) => command,
                None => self.next_command(&commands, &notices).await,
            };
            pending = self.handle_command(command, &commands, &notices).await;
        }
    }

    /// Wait for a command while forwarding changes
    async fn next_command<M: RawMutex, const C_N: usize, const N_N: usize>(
        &mut self,
        commands: &Receiver<'_, M, LinkCommand, C_N>,
        notices: &Sender<'_, M, SyncNotice, N_N>,
    ) -> LinkCommand {
        loop {
            if !self.streaming {
                return commands.receive().await;
            }

            match select(commands.receive(), self.channel.next_change()).await {
                Either::First(command) => return command,
                Either::Second(Ok(item)) => {
                    if let Some(session) = self.session {
                        let notice = SyncNotice::Changed { session, item };
                        if let Some(command) = post(commands, notices, notice).await {
                            return command;
                        }
                    }
                }
                Either::Second(Err(error)) => {
                    warn!("sync connection lost: {:?}", error);
                    self.streaming = false;
                    self.channel.disconnect().await;
                    if let Some(session) = self.session {
                        let notice = SyncNotice::ConnectionLost { session, error };
                        if let Some(command) = post(commands, notices, notice).await {
                            return command;
                        }
                    }
                }
            }
        }
    }

    /// Handle one command; returns a command that interrupted it
    async fn handle_command<M: RawMutex, const C_N: usize, const N_N: usize>(
        &mut self,
        command: LinkCommand,
        commands: &Receiver<'_, M, LinkCommand, C_N>,
        notices: &Sender<'_, M, SyncNotice, N_N>,
    ) -> Option<LinkCommand> {
        match command {
            LinkCommand::Disconnect => {
                self.release().await;
                self.session = None;
                None
            }
            LinkCommand::Connect(session) => {
                self.release().await;
                self.session = Some(session);
                debug!("session {} connecting", session.0);

                let outcome = match select(commands.receive(), self.establish()).await {
                    Either::First(interrupt) => {
                        debug!("session {} interrupted while connecting", session.0);
                        self.channel.abandon_connect();
                        self.channel.disconnect().await;
                        return Some(interrupt);
                    }
                    Either::Second(outcome) => outcome,
                };

                let notice = match outcome {
                    Ok(items) => {
                        self.streaming = true;
                        info!("session {} reconciled {} item(s)", session.0, items.len());
                        SyncNotice::Reconciled { session, items }
                    }
                    Err(error) => {
                        warn!("session {} connect failed: {:?}", session.0, error);
                        self.channel.disconnect().await;
                        SyncNotice::ConnectFailed { session, error }
                    }
                };
                post(commands, notices, notice).await
            }
        }
    }

    /// Connect, subscribe, then fetch what was published meanwhile
    async fn establish(&mut self) -> Result<FetchResult, SyncError> {
        self.channel.connect_timeout(self.connect_timeout).await?;
        self.channel.subscribe(&self.path).await?;
        self.channel.fetch_current(&self.path).await
    }

    async fn release(&mut self) {
        self.streaming = false;
        if self.channel.state() != ConnectionState::Disconnected {
            self.channel.unsubscribe().await;
            self.channel.disconnect().await;
        }
    }
}

/// Post a notice unless a new command arrives first
///
/// Every command ends the session the notice belongs to; a notice that
/// loses the race is stale and is dropped here.
async fn post<M: RawMutex, const C_N: usize, const N_N: usize>(
    commands: &Receiver<'_, M, LinkCommand, C_N>,
    notices: &Sender<'_, M, SyncNotice, N_N>,
    notice: SyncNotice,
) -> Option<LinkCommand> {
    let session = notice.session();
    match select(notices.send(notice), commands.receive()).await {
        Either::First(()) => None,
        Either::Second(command) => {
            debug!("notice for session {} superseded by {:?}", session.0, command);
            Some(command)
        }
    }
}
