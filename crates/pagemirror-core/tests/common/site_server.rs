//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of paths. Unknown paths get 404; paths registered as
//! redirects get 301 with a Location header. The query string is ignored when
//! looking up a path.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    Body(Vec<u8>),
    Redirect(String),
}

#[derive(Debug, Clone, Default)]
pub struct Site {
    routes: HashMap<String, Route>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(path.to_string(), Route::Body(body.into()));
        self
    }

    pub fn redirect(mut self, path: &str, to: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Redirect(to.to_string()));
        self
    }
}

/// Handle to a running server: its origin and the request paths it has seen.
pub struct Running {
    pub origin: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

/// Starts the server in a background thread. Runs until the process exits.
pub fn start(site: Site) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(site.routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &routes, &seen));
        }
    });
    Running {
        origin: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    seen.lock().unwrap().push(path.clone());

    match routes.get(&path) {
        Some(Route::Body(body)) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Redirect(to)) => {
            let head = format!(
                "HTTP/1.1 301 Moved Permanently\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                to
            );
            let _ = stream.write_all(head.as_bytes());
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}
