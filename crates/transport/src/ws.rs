use crate::{Connection, Connector, Frame, TransportError};
use alloy_primitives::Address;
use alloy_rpc_types_eth::Log;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::protocol::{frame::Utf8Bytes, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, trace};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Id of the `eth_subscribe` request on every connection.
const SUBSCRIBE_REQUEST_ID: u64 = 1;

/// Connects to a node's websocket endpoint and subscribes to the logs of one contract.
#[derive(Debug, Clone)]
pub struct WsLogsConnector {
    url: Url,
    address: Address,
}

impl WsLogsConnector {
    /// Creates a connector for logs emitted by `address`.
    pub const fn new(url: Url, address: Address) -> Self {
        Self { url, address }
    }
}

impl Connector for WsLogsConnector {
    type Item = Log;
    type Connection = WsLogsConnection;

    async fn connect(&self) -> Result<WsLogsConnection, TransportError> {
        let (mut stream, _) = connect_async(self.url.as_str()).await?;

        let request = json!({
            "jsonrpc": "2.0",
            "id": SUBSCRIBE_REQUEST_ID,
            "method": "eth_subscribe",
            "params": ["logs", { "address": self.address }],
        });
        stream.send(Message::Text(Utf8Bytes::from(request.to_string()))).await?;

        while let Some(msg) = stream.next().await {
            let Message::Text(text) = msg? else { continue };
            let response: Value = serde_json::from_str(&text)?;
            if response.get("id").and_then(Value::as_u64) != Some(SUBSCRIBE_REQUEST_ID) {
                continue
            }
            if let Some(err) = response.get("error") {
                return Err(TransportError::SubscribeRejected(err.to_string()))
            }
            let Some(subscription) = response.get("result").and_then(Value::as_str) else {
                return Err(TransportError::SubscribeRejected(response.to_string()))
            };
            debug!(target: "ornode::transport", %subscription, address = %self.address, "Subscribed to logs");
            return Ok(WsLogsConnection { stream, subscription: subscription.to_string() })
        }

        Err(TransportError::ClosedDuringHandshake)
    }
}

/// A websocket connection carrying an `eth_subscribe("logs")` feed.
#[derive(Debug)]
pub struct WsLogsConnection {
    stream: WsStream,
    subscription: String,
}

/// Extracts the log from a notification of `subscription`. Other messages yield `None`.
fn parse_notification(text: &str, subscription: &str) -> Result<Option<Log>, TransportError> {
    let mut msg: Value = serde_json::from_str(text)?;
    if msg.get("method").and_then(Value::as_str) != Some("eth_subscription") {
        return Ok(None)
    }
    let Some(params) = msg.get_mut("params") else { return Ok(None) };
    if params.get("subscription").and_then(Value::as_str) != Some(subscription) {
        return Ok(None)
    }
    let Some(result) = params.get_mut("result") else { return Ok(None) };
    Ok(Some(serde_json::from_value(result.take())?))
}

impl Connection for WsLogsConnection {
    type Item = Log;

    async fn next_frame(&mut self) -> Option<Result<Frame<Log>, TransportError>> {
        loop {
            let msg = match self.stream.next().await? {
                Ok(msg) => msg,
                Err(err) => return Some(Err(err.into())),
            };
            match msg {
                Message::Text(text) => match parse_notification(&text, &self.subscription) {
                    Ok(Some(log)) => return Some(Ok(Frame::Item(log))),
                    Ok(None) => trace!(target: "ornode::transport", text = text.as_str(), "Ignoring message"),
                    Err(err) => return Some(Err(err)),
                },
                Message::Pong(_) => return Some(Ok(Frame::Pong)),
                Message::Close(_) => return None,
                Message::Ping(_) | Message::Binary(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn ping(&mut self) -> Result<(), TransportError> {
        self.stream.send(Message::Ping(Default::default())).await?;
        Ok(())
    }

    async fn close(mut self) {
        if let Err(err) = self.stream.close(None).await {
            trace!(target: "ornode::transport", %err, "Error closing websocket");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_notification() {
        let text = json!({
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": {
                "subscription": "0xabc",
                "result": {
                    "address": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                    "topics": [],
                    "data": "0x",
                    "blockHash": "0x0000000000000000000000000000000000000000000000000000000000000010",
                    "blockNumber": "0x10",
                    "transactionIndex": "0x0",
                    "transactionHash": "0x0000000000000000000000000000000000000000000000000000000000000001",
                    "logIndex": "0x2",
                    "removed": false
                }
            }
        })
        .to_string();

        let log = parse_notification(&text, "0xabc").unwrap().unwrap();
        assert_eq!(log.block_number, Some(16));
        assert_eq!(log.log_index, Some(2));

        assert!(parse_notification(&text, "0xother").unwrap().is_none());
        assert!(parse_notification(r#"{"jsonrpc":"2.0","id":3,"result":true}"#, "0xabc").unwrap().is_none());
        assert!(parse_notification("not json", "0xabc").is_err());
    }
}
