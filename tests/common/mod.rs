#![allow(dead_code)]

//! Minimal HTTP/1.1 stub: one canned response per path, every request recorded.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Canned {
    pub fn json(body: &str) -> Self {
        Self { status: 200, content_type: "application/json", body: body.to_string() }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Self { status, content_type: "text/html", body: body.to_string() }
    }
}

pub struct Stub {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    /// Raw request head (request line and headers) of every request seen for `path`.
    pub fn seen(&self, path: &str) -> Vec<String> {
        let needle = format!(" {} ", path);
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.lines().next().map_or(false, |l| l.contains(&needle)))
            .cloned()
            .collect()
    }
}

pub async fn serve(routes: HashMap<String, Canned>) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);
    let log = requests.clone();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => continue,
            };
            let routes = routes.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                let path = head
                    .lines()
                    .next()
                    .and_then(|l| l.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                log.lock().unwrap().push(head);

                let canned = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| Canned::html(404, "<h1>Not Found</h1>"));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    canned.status,
                    canned.content_type,
                    canned.body.len(),
                    canned.body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    Stub { addr, requests }
}
