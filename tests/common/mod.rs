//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What a mock server saw of an incoming request.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
}

/// Log of request heads received by a mock server.
pub type RequestLog = Arc<Mutex<Vec<RequestHead>>>;

/// Start a programmable mock server on an ephemeral port.
///
/// `f` decides the status and body for each request. Bodies are omitted for
/// `HEAD` requests.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let server_log = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let log = server_log.clone();
                    tokio::spawn(async move {
                        serve_one(socket, f.as_ref(), log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

async fn serve_one<F, Fut>(mut socket: TcpStream, f: &F, log: RequestLog)
where
    F: Fn(RequestHead) -> Fut,
    Fut: Future<Output = (u16, String)>,
{
    let Some(head) = read_head(&mut socket).await else {
        return;
    };
    log.lock().unwrap().push(head.clone());

    let is_head = head.method == "HEAD";
    let (status, body) = f(head).await;
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        if is_head { "" } else { body.as_str() }
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

async fn read_head(socket: &mut TcpStream) -> Option<RequestHead> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 || buf.len() > 16 * 1024 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf);
    let mut request_line = text.lines().next()?.split_whitespace();
    Some(RequestHead {
        method: request_line.next()?.to_string(),
        path: request_line.next()?.to_string(),
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Start a mirror that answers every request with `status` after `delay`.
pub async fn start_mirror(status: u16, delay: Duration) -> (SocketAddr, RequestLog) {
    start_programmable_backend(move |_| async move {
        tokio::time::sleep(delay).await;
        (status, String::new())
    })
    .await
}

/// Start a server that hands out `list` as the mirror list.
pub async fn start_list_server(list: String) -> (SocketAddr, RequestLog) {
    start_programmable_backend(move |_| {
        let list = list.clone();
        async move { (200, list) }
    })
    .await
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Base URL of a mock mirror under `/root/`.
pub fn mirror_base(addr: SocketAddr) -> String {
    format!("http://{}/root/", addr)
}

/// HTTP client that never goes through a proxy and never follows redirects.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
