//! Live-update listener for the board's push endpoint.
//!
//! One WebSocket connection is opened at start-up. Every text frame replaces
//! the board display region verbatim. There is no reconnect: when the server
//! closes the socket or the transport fails, the listener task ends quietly.

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::error::BoardError;
use crate::page::{with_page, ElementId, SharedPage};

/// Sent to the front end after the board region changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    pub markup: String,
}

/// Why a listener stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerExit {
    /// The server sent a close frame or ended the stream.
    Closed,
    /// The transport failed mid-stream.
    Failed(String),
}

/// Connect to `url` and spawn the read loop.
///
/// The handshake happens before this returns, so a refused connection is
/// reported to the caller. Everything after that is handled inside the task.
pub async fn subscribe(
    url: &str,
    page: SharedPage,
    updates: Option<mpsc::UnboundedSender<BoardUpdate>>,
) -> Result<JoinHandle<ListenerExit>, BoardError> {
    let (ws_stream, _resp) = connect_async(url)
        .await
        .map_err(|source| BoardError::Subscribe {
            url: url.to_string(),
            source,
        })?;
    info!(%url, "subscribed to board updates");

    Ok(tokio::spawn(listen(ws_stream, page, updates)))
}

/// Apply frames from an open socket to the page until it closes.
pub async fn listen(
    mut ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    page: SharedPage,
    updates: Option<mpsc::UnboundedSender<BoardUpdate>>,
) -> ListenerExit {
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(WsMessage::Text(markup)) => {
                with_page(&page, |p| p.set_inner_html(ElementId::BoardMessage, markup.clone()));
                if let Some(tx) = &updates {
                    // The front end may already be gone; the page is still current.
                    let _ = tx.send(BoardUpdate { markup });
                }
            }
            Ok(WsMessage::Close(frame)) => {
                debug!(?frame, "board socket closed by server");
                return ListenerExit::Closed;
            }
            // Binary frames carry no board markup; ping/pong is answered by tungstenite.
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "board socket failed");
                return ListenerExit::Failed(e.to_string());
            }
        }
    }
    debug!("board socket stream ended");
    ListenerExit::Closed
}
