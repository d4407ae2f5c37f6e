//! Shared helpers for the harness tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use vdbbench::prelude::*;

/// Raw option values from pairs.
pub fn raw(pairs: &[(&str, &str)]) -> RawParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A dispatcher over every registered command.
pub fn dispatcher() -> Dispatcher {
    Dispatcher::from_registry().expect("registry composes")
}

/// Options that keep a run small: few vectors, few queries, one short
/// concurrency level.
pub fn quick(pairs: &[(&str, &str)]) -> RawParams {
    let mut values = raw(&[
        ("num_vectors", "20"),
        ("num_queries", "3"),
        ("batch_size", "10"),
        ("k", "5"),
        ("num_concurrency", "2"),
        ("concurrency_duration", "1"),
        ("request_timeout", "5"),
        ("optimize_timeout", "5"),
    ]);
    values.extend(raw(pairs));
    values
}

// =============================================================================
// HTTP stub server
// =============================================================================

/// One request seen by a [`StubServer`].
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Request {
    /// Header value, case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

type Handler = dyn Fn(&Request) -> (u16, String) + Send + Sync;

/// Minimal HTTP/1.1 server answering every request through a handler.
///
/// One connection per request (`Connection: close`), served on a background
/// thread that lives as long as the test process.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl StubServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let handler: Arc<Handler> = Arc::new(handler);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let seen = Arc::clone(&seen);
                let handler = Arc::clone(&handler);
                thread::spawn(move || serve(stream, &*handler, &seen));
            }
        });

        Self { addr, requests }
    }

    /// Base URL
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Requests with the given method whose path starts with `prefix`
    pub fn matching(&self, method: &str, prefix: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }
}

fn serve(stream: TcpStream, handler: &Handler, seen: &Mutex<Vec<Request>>) {
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(_) => return,
    };
    let Some(request) = read_request(stream) else {
        return;
    };
    let (status, body) = handler(&request);
    seen.lock().push(request);
    let _ = write!(
        writer,
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = writer.flush();
}

fn read_request(stream: TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name.to_string(), value));
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(Request {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
