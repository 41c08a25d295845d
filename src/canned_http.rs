//! One-shot loopback HTTP server for exercising the lookup clients.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// A server that answers exactly one request with a canned response.
pub struct CannedServer {
    base: String,
    requests: mpsc::Receiver<String>,
}

impl CannedServer {
    /// Serves `body` with the given status line, e.g. `"404 Not Found"`.
    pub fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, requests) = mpsc::channel();

        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            // drain headers; the lookups never send a body
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 2 {
                line.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request_line.trim_end().to_string());
        });

        Self { base, requests }
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Request line of the served request, like `GET /words?ml=sea HTTP/1.1`.
    pub fn request_line(&self) -> String {
        self.requests
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap()
    }
}
