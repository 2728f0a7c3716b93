//! In-process fixture servers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use board_client::Endpoints;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message as WsMessage;

// ---------------------------------------------------------------------------
// HTTP fixture
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".into(), "text/plain".into())],
            body: body.to_string(),
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self {
            status,
            headers: vec![("Location".into(), location.into())],
            body: String::new(),
        }
    }
}

/// A request as the fixture server saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct HttpFixture {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl HttpFixture {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.addr.to_string(), false).unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Serve canned replies keyed by `(method, path)`. Unknown routes get an empty 404.
pub async fn serve_http(routes: Vec<(&str, &str, Reply)>) -> HttpFixture {
    let routes: Arc<HashMap<(String, String), Reply>> = Arc::new(
        routes
            .into_iter()
            .map(|(m, p, r)| ((m.to_string(), p.to_string()), r))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            let log = log.clone();
            tokio::spawn(async move {
                handle_http(stream, routes, log).await;
            });
        }
    });

    HttpFixture { addr, requests }
}

async fn read_request(stream: &mut TcpStream) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let mut headers = [httparse::EMPTY_HEADER; 32];
        let mut req = httparse::Request::new(&mut headers);
        if let httparse::Status::Complete(head_len) = req.parse(&buf).ok()? {
            let header = |name: &str| {
                req.headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case(name))
                    .and_then(|h| std::str::from_utf8(h.value).ok())
                    .map(str::to_string)
            };
            let content_length = header("content-length")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() < head_len + content_length {
                continue;
            }
            return Some(Captured {
                method: req.method?.to_string(),
                path: req.path?.to_string(),
                content_type: header("content-type"),
                body: String::from_utf8_lossy(&buf[head_len..head_len + content_length])
                    .into_owned(),
            });
        }
    }
}

async fn handle_http(
    mut stream: TcpStream,
    routes: Arc<HashMap<(String, String), Reply>>,
    log: Arc<Mutex<Vec<Captured>>>,
) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    let reply = routes
        .get(&(request.method.clone(), request.path.clone()))
        .cloned()
        .unwrap_or_else(|| Reply::text(404, ""));
    log.lock().unwrap().push(request);

    let mut head = format!("HTTP/1.1 {} {}\r\n", reply.status, reason(reply.status));
    for (name, value) in &reply.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        reply.body.len()
    ));
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(reply.body.as_bytes()).await;
    let _ = stream.shutdown().await;
}

// ---------------------------------------------------------------------------
// WebSocket fixture
// ---------------------------------------------------------------------------

pub struct WsFixture {
    pub addr: SocketAddr,
    path: Arc<Mutex<Option<String>>>,
}

impl WsFixture {
    pub fn url(&self) -> String {
        format!("ws://{}/subscribe", self.addr)
    }

    /// Path of the upgrade request, once a client has connected.
    pub fn requested_path(&self) -> Option<String> {
        self.path.lock().unwrap().clone()
    }
}

/// Accept one client, send `frames`, then close the socket.
///
/// With `graceful == false` the TCP stream is dropped without a close frame.
pub async fn serve_ws(frames: Vec<WsMessage>, graceful: bool) -> WsFixture {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let path = Arc::new(Mutex::new(None));

    let seen = path.clone();
    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            *seen.lock().unwrap() = Some(req.uri().path().to_string());
            Ok(resp)
        };
        let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
            return;
        };
        for frame in frames {
            if ws.send(frame).await.is_err() {
                return;
            }
        }
        if graceful {
            let _ = ws.close(None).await;
            while let Some(Ok(_)) = ws.next().await {}
        }
    });

    WsFixture { addr, path }
}
