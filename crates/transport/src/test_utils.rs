//! Scripted connections for supervisor tests.

use crate::{Connection, Connector, Frame, TransportError};
use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::mpsc;

#[derive(Debug)]
enum RemoteEvent {
    Item(u64),
    Pong,
    Close,
}

#[derive(Debug, Default)]
struct RemoteState {
    pings: AtomicUsize,
    closed: AtomicBool,
    auto_pong: AtomicBool,
}

/// Test side of a mock connection.
#[derive(Debug)]
pub(crate) struct MockRemote {
    events: mpsc::UnboundedSender<RemoteEvent>,
    state: Arc<RemoteState>,
}

impl MockRemote {
    pub(crate) fn item(&self, item: u64) {
        let _ = self.events.send(RemoteEvent::Item(item));
    }

    pub(crate) fn close(&self) {
        let _ = self.events.send(RemoteEvent::Close);
    }

    /// Answer every ping with a pong.
    pub(crate) fn auto_pong(&self, enabled: bool) {
        self.state.auto_pong.store(enabled, Ordering::SeqCst);
    }

    pub(crate) fn pings(&self) -> usize {
        self.state.pings.load(Ordering::SeqCst)
    }

    /// True once the supervisor closed its end.
    pub(crate) fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub(crate) struct MockConnection {
    events: mpsc::UnboundedReceiver<RemoteEvent>,
    loopback: mpsc::UnboundedSender<RemoteEvent>,
    state: Arc<RemoteState>,
}

impl Connection for MockConnection {
    type Item = u64;

    async fn next_frame(&mut self) -> Option<Result<Frame<u64>, TransportError>> {
        match self.events.recv().await? {
            RemoteEvent::Item(item) => Some(Ok(Frame::Item(item))),
            RemoteEvent::Pong => Some(Ok(Frame::Pong)),
            RemoteEvent::Close => None,
        }
    }

    async fn ping(&mut self) -> Result<(), TransportError> {
        self.state.pings.fetch_add(1, Ordering::SeqCst);
        if self.state.auto_pong.load(Ordering::SeqCst) {
            let _ = self.loopback.send(RemoteEvent::Pong);
        }
        Ok(())
    }

    async fn close(self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

/// Hands out queued connections in order. Queued failures and attempts beyond the queue are
/// refused.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockConnector {
    queue: Arc<Mutex<VecDeque<Option<MockConnection>>>>,
    attempts: Arc<AtomicUsize>,
}

impl MockConnector {
    pub(crate) fn push_connection(&self) -> MockRemote {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(RemoteState::default());
        let conn = MockConnection { events: rx, loopback: tx.clone(), state: Arc::clone(&state) };
        self.queue.lock().push_back(Some(conn));
        MockRemote { events: tx, state }
    }

    pub(crate) fn push_failure(&self) {
        self.queue.lock().push_back(None);
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for MockConnector {
    type Item = u64;
    type Connection = MockConnection;

    async fn connect(&self) -> Result<MockConnection, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(Some(conn)) = self.queue.lock().pop_front() {
            return Ok(conn)
        }
        let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        Err(TransportError::WebSocket(refused.into()))
    }
}
