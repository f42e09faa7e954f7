//! HttpScmClient against a minimal local HTTP server.

use std::time::Duration;

use scm_wizard_http::{ClientError, HttpScmClient, NamedItem, ScmClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve a single response and return the request line that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
  let listener = TcpListener::bind("127.0.0.1:0")
    .await
    .expect("failed to bind listener");
  let addr = listener.local_addr().expect("no local address");

  let handle = tokio::spawn(async move {
    let (mut socket, _) = listener.accept().await.expect("accept failed");
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
      let n = socket.read(&mut buf).await.expect("read failed");
      request.extend_from_slice(&buf[..n]);
      if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
        break;
      }
    }

    let response = format!(
      "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
      status,
      body.len(),
      body
    );
    socket
      .write_all(response.as_bytes())
      .await
      .expect("write failed");
    let _ = socket.shutdown().await;

    String::from_utf8_lossy(&request)
      .lines()
      .next()
      .unwrap_or_default()
      .to_string()
  });

  (format!("http://{}/rest/", addr), handle)
}

fn client(base_url: &str) -> HttpScmClient {
  let inner = reqwest::Client::builder()
    .no_proxy()
    .timeout(Duration::from_secs(5))
    .build()
    .expect("failed to build reqwest client");
  HttpScmClient::with_client(inner, base_url).expect("invalid base url")
}

#[tokio::test]
async fn test_exists_true() {
  let (base, server) = serve_once("200 OK", "true").await;

  let exists = client(&base)
    .exists("git", "service:scm:git:dev", "eng-portal")
    .await
    .expect("exists failed");

  assert!(exists);
  assert_eq!(
    server.await.unwrap(),
    "GET /rest/service/scm/git/service:scm:git:dev/eng-portal/exists HTTP/1.1"
  );
}

#[tokio::test]
async fn test_exists_encodes_identifier() {
  let (base, server) = serve_once("200 OK", "false").await;

  let exists = client(&base)
    .exists("git", "dev", "eng a/b")
    .await
    .expect("exists failed");

  assert!(!exists);
  assert_eq!(
    server.await.unwrap(),
    "GET /rest/service/scm/git/dev/eng%20a%2Fb/exists HTTP/1.1"
  );
}

#[tokio::test]
async fn test_server_error_is_transient() {
  let (base, server) = serve_once("503 Service Unavailable", "").await;

  let err = client(&base)
    .exists("git", "dev", "eng")
    .await
    .expect_err("503 should fail");

  assert!(matches!(err, ClientError::Status { status: 503, .. }));
  assert!(err.is_transient());
  server.await.unwrap();
}

#[tokio::test]
async fn test_search_groups_unwraps_page() {
  let (base, server) = serve_once(
    "200 OK",
    r#"{"data":[{"id":"dev","name":"Developers"},{"id":"ops","name":"Operations"}]}"#,
  )
  .await;

  let groups = client(&base)
    .search_groups(42, "dev", "o")
    .await
    .expect("search failed");

  assert_eq!(
    groups,
    vec![
      NamedItem::new("dev", "Developers"),
      NamedItem::new("ops", "Operations"),
    ]
  );
  assert_eq!(
    server.await.unwrap(),
    "GET /rest/service/id/ldap/group/subscriptions/42/dev/o HTTP/1.1"
  );
}

#[tokio::test]
async fn test_search_repositories_bare_array() {
  let (base, server) = serve_once("200 OK", r#"[{"id":"eng-portal","name":"eng-portal"}]"#).await;

  let repositories = client(&base)
    .search_repositories("git", "dev", "portal")
    .await
    .expect("search failed");

  assert_eq!(repositories, vec![NamedItem::new("eng-portal", "eng-portal")]);
  assert_eq!(
    server.await.unwrap(),
    "GET /rest/service/scm/git/dev/portal HTTP/1.1"
  );
}

#[tokio::test]
async fn test_invalid_payload() {
  let (base, server) = serve_once("200 OK", r#"{"exists":true}"#).await;

  let err = client(&base)
    .exists("git", "dev", "eng")
    .await
    .expect_err("object payload should fail");

  assert!(matches!(err, ClientError::InvalidResponse { .. }));
  assert!(!err.is_transient());
  server.await.unwrap();
}
