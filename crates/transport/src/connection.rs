use crate::TransportError;
use std::future::Future;

/// A frame read from a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<T> {
    /// A subscription item.
    Item(T),
    /// Answer to a keep-alive ping.
    Pong,
}

/// Opens connections to the subscription source.
pub trait Connector: Send + Sync + 'static {
    /// Item the subscription yields.
    type Item: Send + 'static;
    /// Connection type.
    type Connection: Connection<Item = Self::Item>;

    /// Opens a connection with the subscription established.
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// An established subscription connection.
pub trait Connection: Send + 'static {
    /// Item the subscription yields.
    type Item: Send + 'static;

    /// Reads the next frame. `None` means the remote closed the connection.
    ///
    /// Must be cancel safe.
    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Option<Result<Frame<Self::Item>, TransportError>>> + Send;

    /// Sends a keep-alive ping.
    fn ping(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the connection.
    fn close(self) -> impl Future<Output = ()> + Send;
}
