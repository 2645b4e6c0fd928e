use crate::{Connection, Connector, Frame, TransportConfig, TransportError};
use futures_util::Stream;
use std::{
    fmt,
    pin::Pin,
    task::{ready, Context, Poll},
    time::Duration,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{sleep, sleep_until, Instant, MissedTickBehavior, Sleep},
};
use tracing::{debug, info, trace, warn};

/// Stand-in deadline for connections without a maximum age.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Why a connection ended.
#[derive(Debug)]
enum Disconnect {
    /// The subscription was cancelled or the consumer went away.
    Stopped,
    /// The remote closed the connection.
    Closed,
    /// No pong arrived in time.
    PongTimeout,
    /// The connection reached its maximum age.
    MaxAge,
    /// Reading or pinging failed.
    Error(TransportError),
}

impl fmt::Display for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("stopped"),
            Self::Closed => f.write_str("closed by remote"),
            Self::PongTimeout => f.write_str("pong timeout"),
            Self::MaxAge => f.write_str("maximum connection age reached"),
            Self::Error(err) => write!(f, "{err}"),
        }
    }
}

/// Supervisor task keeping a subscription alive.
///
/// The task cycles through connecting, forwarding items while keeping the connection alive, and
/// reconnecting after any failure, until it is cancelled through its [`SubscriptionHandle`] or the
/// consumer drops the [`Subscription`].
#[derive(Debug)]
pub struct ResilientSubscription<C: Connector> {
    connector: C,
    config: TransportConfig,
    items: mpsc::Sender<C::Item>,
    cancelled: watch::Receiver<bool>,
}

impl<C: Connector> ResilientSubscription<C> {
    /// Spawns the supervisor on the current tokio runtime.
    pub fn spawn(
        connector: C,
        config: TransportConfig,
    ) -> (SubscriptionHandle, Subscription<C::Item>) {
        let (items, rx) = mpsc::channel(config.channel_capacity.max(1));
        let (cancel, cancelled) = watch::channel(false);

        let supervisor = Self { connector, config, items, cancelled: cancelled.clone() };
        let task = tokio::spawn(supervisor.run());

        (SubscriptionHandle { cancel, task: Some(task) }, Subscription { rx, cancelled })
    }

    async fn run(mut self) {
        let mut attempt = 0u64;
        loop {
            attempt += 1;
            debug!(target: "ornode::transport", attempt, "Connecting");
            let connected = tokio::select! {
                biased;
                _ = cancellation(&mut self.cancelled) => return,
                res = self.connector.connect() => res,
            };
            let conn = match connected {
                Ok(conn) => conn,
                Err(err) => {
                    warn!(target: "ornode::transport", %err, attempt, "Connection attempt failed");
                    if !self.wait(self.config.reconnect_delay).await {
                        return
                    }
                    continue
                }
            };
            info!(target: "ornode::transport", attempt, "Subscription connected");
            attempt = 0;

            match self.drive(conn).await {
                Disconnect::Stopped => {
                    debug!(target: "ornode::transport", "Subscription stopped");
                    return
                }
                Disconnect::MaxAge => {
                    info!(target: "ornode::transport", "Replacing connection at maximum age");
                }
                reason => {
                    warn!(target: "ornode::transport", %reason, "Connection lost, reconnecting");
                    if !self.wait(self.config.reconnect_delay).await {
                        return
                    }
                }
            }
        }
    }

    /// Sleeps for `delay`. Returns false if the subscription stopped meanwhile.
    async fn wait(&mut self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = cancellation(&mut self.cancelled) => false,
            _ = self.items.closed() => false,
            _ = sleep(delay) => true,
        }
    }

    /// Forwards items from `conn` until it fails, ages out, or the subscription stops.
    async fn drive(&mut self, mut conn: C::Connection) -> Disconnect {
        let opened = Instant::now();
        let ping_interval = self.config.ping_interval;
        let mut ping = tokio::time::interval_at(opened + ping_interval, ping_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut pong_deadline: Option<Pin<Box<Sleep>>> = None;

        let max_age = self.config.max_connection_age;
        let age_limit = sleep_until(opened + max_age.unwrap_or(FAR_FUTURE));
        tokio::pin!(age_limit);

        let reason = loop {
            tokio::select! {
                biased;
                _ = cancellation(&mut self.cancelled) => break Disconnect::Stopped,
                _ = self.items.closed() => break Disconnect::Stopped,
                _ = &mut age_limit, if max_age.is_some() => break Disconnect::MaxAge,
                _ = pong_timeout(&mut pong_deadline) => break Disconnect::PongTimeout,
                _ = ping.tick() => {
                    if let Err(err) = conn.ping().await {
                        break Disconnect::Error(err)
                    }
                    trace!(target: "ornode::transport", "Sent ping");
                    if pong_deadline.is_none() {
                        pong_deadline = Some(Box::pin(sleep(self.config.pong_timeout)));
                    }
                }
                frame = conn.next_frame() => match frame {
                    Some(Ok(Frame::Item(item))) => {
                        tokio::select! {
                            biased;
                            _ = cancellation(&mut self.cancelled) => break Disconnect::Stopped,
                            res = self.items.send(item) => if res.is_err() {
                                break Disconnect::Stopped
                            },
                        }
                    }
                    Some(Ok(Frame::Pong)) => {
                        trace!(target: "ornode::transport", "Received pong");
                        pong_deadline = None;
                    }
                    Some(Err(err)) => break Disconnect::Error(err),
                    None => break Disconnect::Closed,
                },
            }
        };

        conn.close().await;
        reason
    }
}

/// Resolves once the subscription is cancelled or its handle is gone.
async fn cancellation(cancelled: &mut watch::Receiver<bool>) {
    let _ = cancelled.wait_for(|cancelled| *cancelled).await;
}

/// Resolves when the armed pong deadline passes. Never resolves while unarmed.
async fn pong_timeout(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(deadline) => deadline.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Cancels a [`ResilientSubscription`].
///
/// Cancelling is idempotent. Dropping the handle cancels as well.
#[derive(Debug)]
pub struct SubscriptionHandle {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Stops the subscription. Once this returns, the [`Subscription`] yields no further items.
    pub fn cancel(&self) {
        if !self.cancel.send_replace(true) {
            debug!(target: "ornode::transport", "Cancelling subscription");
        }
    }

    /// Returns true once [`Self::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Cancels the subscription and waits until its connection is closed.
    pub async fn stop(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Items of a [`ResilientSubscription`], in delivery order.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
    cancelled: watch::Receiver<bool>,
}

impl<T> Subscription<T> {
    /// Receives the next item. Returns `None` once the subscription was cancelled.
    pub async fn recv(&mut self) -> Option<T> {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if *self.cancelled.borrow() {
            return Poll::Ready(None)
        }
        let item = ready!(self.rx.poll_recv(cx));
        // cancellation may have happened while the item was buffered
        if *self.cancelled.borrow() {
            return Poll::Ready(None)
        }
        Poll::Ready(item)
    }
}
