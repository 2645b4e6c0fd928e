/// Errors of a single connection. They never reach the consumer of a subscription.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Websocket protocol or IO failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    /// A message could not be parsed.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    /// The node refused the subscription request.
    #[error("subscription rejected: {0}")]
    SubscribeRejected(String),
    /// The connection closed before the subscription was confirmed.
    #[error("connection closed during subscription handshake")]
    ClosedDuringHandshake,
}
