//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use navproxy::config::GatewayConfig;
use navproxy::http::GatewayServer;
use navproxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A gateway serving on an ephemeral local port.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// `/proxy?url=<target>[&key=<key>]` on this gateway.
    pub fn proxy_url(&self, target: &str, key: Option<&str>) -> String {
        let mut path = format!("/proxy?url={}", urlencoding::encode(target));
        if let Some(key) = key {
            path.push_str(&format!("&key={}", urlencoding::encode(key)));
        }
        self.url(&path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway with the given config. The listener is bound before returning.
pub async fn spawn_gateway(mut config: GatewayConfig) -> TestGateway {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway { addr, shutdown }
}

/// Client that neither follows redirects nor uses system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Expected gateway link for an absolute URL.
pub fn gateway_link(absolute: &str, key: Option<&str>) -> String {
    let mut link = format!("/proxy?url={}", urlencoding::encode(absolute));
    if let Some(key) = key {
        link.push_str(&format!("&key={}", urlencoding::encode(key)));
    }
    link
}
