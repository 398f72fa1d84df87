//! One-shot WebSocket session with a single page target.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use crate::error::CdpError;
use crate::protocol::{CdpRequest, CdpResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Direct connection to a page's debugger WebSocket.
///
/// Commands are issued one at a time, so replies are matched by reading
/// until the expected id arrives; events in between are dropped.
pub struct PageSession {
    ws: WsStream,
    next_id: u64,
    call_timeout: Duration,
}

impl PageSession {
    pub async fn connect(ws_url: &str, call_timeout: Duration) -> Result<Self, CdpError> {
        let (ws, _) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;
        debug!("Attached to page {}", ws_url);
        Ok(Self {
            ws,
            next_id: 1,
            call_timeout,
        })
    }

    /// Send a CDP command and wait for its result.
    pub async fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        let id = self.next_id;
        self.next_id += 1;

        let json = serde_json::to_string(&CdpRequest {
            id,
            method: method.to_string(),
            params,
        })?;
        trace!("CDP send: {}", json);
        self.ws.send(Message::Text(json.into())).await?;

        match tokio::time::timeout(self.call_timeout, Self::wait_for(&mut self.ws, id)).await {
            Ok(result) => result,
            Err(_) => Err(CdpError::Timeout(format!("Request {} timed out", method))),
        }
    }

    async fn wait_for(ws: &mut WsStream, id: u64) -> Result<Value, CdpError> {
        while let Some(msg) = ws.next().await {
            match msg? {
                Message::Text(text) => {
                    trace!("CDP recv: {}", text);
                    let resp: CdpResponse = serde_json::from_str(&text)?;
                    if resp.id != Some(id) {
                        continue;
                    }
                    if let Some(error) = resp.error {
                        return Err(CdpError::Protocol {
                            code: error.code,
                            message: error.message,
                        });
                    }
                    return Ok(resp.result.unwrap_or(Value::Null));
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        Err(CdpError::SessionClosed)
    }

    /// Raw `Runtime.evaluate` result, exception details included.
    pub async fn evaluate(&mut self, expression: &str) -> Result<Value, CdpError> {
        self.call(
            "Runtime.evaluate",
            Some(json!({
                "expression": expression,
                "returnByValue": true,
                "awaitPromise": true,
            })),
        )
        .await
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
