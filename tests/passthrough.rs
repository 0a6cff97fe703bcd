//! End-to-end tests for the non-HTML path and header forwarding.

use std::net::SocketAddr;
use std::time::Duration;

use navproxy::config::GatewayConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{client, spawn_gateway};

fn binary_body() -> Vec<u8> {
    (0..=255u8).cycle().take(64 * 1024 + 7).collect()
}

#[tokio::test]
async fn test_binary_body_is_byte_identical() {
    let upstream = MockServer::start().await;
    let body = binary_body();
    Mock::given(method("GET"))
        .and(path("/blob.bin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.clone(), "application/octet-stream")
                .insert_header("cache-control", "max-age=3600")
                .insert_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")
                .insert_header("set-cookie", "tracking=1")
                .insert_header("x-powered-by", "origin")
                .insert_header("etag", "\"abc\""),
        )
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(GatewayConfig::default()).await;
    let response = client()
        .get(gateway.proxy_url(&format!("{}/blob.bin", upstream.uri()), None))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let headers = response.headers().clone();
    assert_eq!(headers.get("content-type").unwrap(), "application/octet-stream");
    assert_eq!(headers.get("cache-control").unwrap(), "max-age=3600");
    assert_eq!(
        headers.get("last-modified").unwrap(),
        "Wed, 21 Oct 2015 07:28:00 GMT"
    );
    assert!(headers.get("set-cookie").is_none());
    assert!(headers.get("x-powered-by").is_none());
    assert!(headers.get("etag").is_none());

    let received = response.bytes().await.unwrap();
    assert_eq!(received.len(), body.len());
    assert!(received[..] == body[..]);
}

#[tokio::test]
async fn test_content_encoding_passes_through_undecoded() {
    let upstream = MockServer::start().await;
    // Not real gzip; the gateway must not try to decode it.
    let payload = b"\x1f\x8bnot-really-gzip".to_vec();
    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(payload.clone(), "application/javascript")
                .insert_header("content-encoding", "gzip"),
        )
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(GatewayConfig::default()).await;
    let response = client()
        .get(gateway.proxy_url(&format!("{}/app.js", upstream.uri()), None))
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");
    assert_eq!(response.bytes().await.unwrap().to_vec(), payload);
}

#[tokio::test]
async fn test_non_html_text_is_not_rewritten() {
    let upstream = MockServer::start().await;
    let json = r#"{"link":"<a href=\"/x\">x</a>"}"#;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(json, "application/json"))
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(GatewayConfig::default()).await;
    let body = client()
        .get(gateway.proxy_url(&format!("{}/data.json", upstream.uri()), None))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, json);
}

#[tokio::test]
async fn test_forwards_only_user_agent_accept_and_cookie() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echo"))
        .and(header("user-agent", "integration-test"))
        .and(header("accept", "image/webp"))
        .and(header("cookie", "session=42"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/plain"))
        .expect(1)
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(GatewayConfig::default()).await;
    let response = client()
        .get(gateway.proxy_url(&format!("{}/echo", upstream.uri()), None))
        .header("user-agent", "integration-test")
        .header("accept", "image/webp")
        .header("cookie", "session=42")
        .header("authorization", "Bearer gateway-only")
        .header("x-forwarded-for", "10.0.0.1")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let forwarded = &requests[0].headers;
    assert!(forwarded.get("authorization").is_none());
    assert!(forwarded.get("x-forwarded-for").is_none());
    upstream.verify().await;
}

#[tokio::test]
async fn test_default_user_agent_and_accept() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/defaults"))
        .and(header("accept", "*/*"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/plain"))
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(GatewayConfig::default()).await;
    // the test client sends no user-agent of its own
    let response = client()
        .get(gateway.proxy_url(&format!("{}/defaults", upstream.uri()), None))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let requests = upstream.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("navproxy/"), "{agent}");
}

/// Origin that sends a 30-byte body in three chunks, 700ms apart.
async fn spawn_trickling_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\ncontent-length: 30\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        for chunk in [b"0123456789", b"abcdefghij", b"ABCDEFGHIJ"] {
            tokio::time::sleep(Duration::from_millis(700)).await;
            socket.write_all(chunk).await.unwrap();
            socket.flush().await.unwrap();
        }
    });
    addr
}

#[tokio::test]
async fn test_slow_steady_download_is_not_truncated() {
    let origin = spawn_trickling_origin().await;

    let mut config = GatewayConfig::default();
    config.timeouts.upstream_secs = 1;
    let gateway = spawn_gateway(config).await;

    let response = client()
        .get(gateway.proxy_url(&format!("http://{origin}/slow.bin"), None))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.bytes().await.unwrap();
    assert_eq!(&body[..], b"0123456789abcdefghijABCDEFGHIJ");
}
