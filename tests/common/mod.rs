//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cart_offers::{HttpServer, ServiceConfig, Shutdown};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A running service plus the handle that stops it.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn add_offer(
        &self,
        restaurant_id: i64,
        offer_type: &str,
        offer_value: i64,
        segments: &[&str],
    ) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/offer"))
            .json(&json!({
                "restaurant_id": restaurant_id,
                "offer_type": offer_type,
                "offer_value": offer_value,
                "customer_segments": segments,
            }))
            .send()
            .await
            .expect("service unreachable")
    }

    /// Apply offers and return the resulting cart value. Panics on non-200.
    pub async fn apply(&self, restaurant_id: i64, cart_value: i64, user_id: i64) -> i64 {
        let res = self
            .client
            .post(self.url("/api/v1/cart/apply_offer"))
            .json(&json!({
                "cart_value": cart_value,
                "restaurant_id": restaurant_id,
                "user_id": user_id,
            }))
            .send()
            .await
            .expect("service unreachable");
        assert_eq!(res.status(), 200);

        let body: Value = res.json().await.unwrap();
        body["cart_value"].as_i64().expect("cart_value missing")
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start the service on an ephemeral port.
///
/// `configure` receives the config and the address the service will listen
/// on, so a remote segment endpoint can point back at the service itself.
pub async fn start_service(configure: impl FnOnce(&mut ServiceConfig, SocketAddr)) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServiceConfig::default();
    config.listener.bind_address = addr.to_string();
    configure(&mut config, addr);

    let server = HttpServer::new(config).expect("server construction failed");
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestService {
        addr,
        shutdown,
        client: test_client(),
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a programmable mock segment service. `f` returns status, body and a
/// delay applied before answering.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String, Duration)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body, delay) = f().await;
                        tokio::time::sleep(delay).await;

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Mock segment service that always answers with `segment`.
#[allow(dead_code)]
pub async fn start_segment_backend(segment: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move {
        (200, json!({ "segment": segment }).to_string(), Duration::ZERO)
    })
    .await
}
