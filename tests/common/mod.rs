//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use productpage::config::ServiceConfig;
use productpage::{HttpServer, ProductPageConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A mock downstream service that counts the requests it receives.
pub struct MockBackend {
    pub addr: SocketAddr,
    calls: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Number of requests answered so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Raw request heads (request line and headers), in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock backend that always answers with `status` and `body`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockBackend {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// Start a programmable mock backend. `f` receives the 0-based index of the
/// request and returns the status and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let backend = MockBackend {
        addr,
        calls: calls.clone(),
        requests: requests.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let calls = calls.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        serve_one(socket, f, calls, requests).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    backend
}

async fn serve_one<F, Fut>(
    mut socket: TcpStream,
    f: Arc<F>,
    calls: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<String>>>,
) where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = (u16, String)>,
{
    let Some(head) = read_request_head(&mut socket).await else {
        return;
    };

    let index = calls.fetch_add(1, Ordering::SeqCst);
    requests.lock().unwrap().push(head);

    let (status, body) = f(index).await;
    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request_head(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            return Some(String::from_utf8_lossy(&buf[..end]).into_owned());
        }
    }
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn service(addr: SocketAddr) -> ServiceConfig {
    ServiceConfig {
        hostname: addr.ip().to_string(),
        port: addr.port(),
    }
}

/// Config pointing the three services at the given addresses.
pub fn config_for(details: SocketAddr, reviews: SocketAddr, ratings: SocketAddr) -> ProductPageConfig {
    let mut config = ProductPageConfig::default();
    config.services.details = service(details);
    config.services.reviews = service(reviews);
    config.services.ratings = service(ratings);
    config.timeouts.downstream_secs = 5;
    config
}

/// A running product page.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the product page on an ephemeral port.
pub async fn start_productpage(config: ProductPageConfig) -> TestServer {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown }
}

/// HTTP client that talks to the test server directly and does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Value of the `request_result` counter for one label pair in a `/metrics` body.
pub fn request_results(rendered: &str, destination: &str, code: u16) -> u64 {
    let destination = format!("destination_app=\"{destination}\"");
    let code = format!("response_code=\"{code}\"");
    rendered
        .lines()
        .filter(|line| line.starts_with("request_result{"))
        .filter(|line| line.contains(&destination) && line.contains(&code))
        .filter_map(|line| line.rsplit(' ').next()?.parse::<f64>().ok())
        .map(|value| value as u64)
        .sum()
}

/// Fetch `/metrics` from a running server.
pub async fn scrape(server: &TestServer) -> String {
    client()
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}
