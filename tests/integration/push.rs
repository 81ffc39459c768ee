use feed_core::{FeatureCollection, FeedError};
use funda_feed::{push, PushConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one HTTP request, answer with `status` and `body`, and hand back
/// the raw request text.
async fn one_shot_server(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/listings/refresh", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (url, handle)
}

#[test]
fn test_missing_destination_is_a_config_error() {
    let err = PushConfig::from_parts(None, Some("secret".to_string())).unwrap_err();
    assert!(matches!(err, FeedError::Config(ref msg) if msg.contains("REFRESH_URL")));

    let err = PushConfig::from_parts(Some("https://map.example.com/refresh".to_string()), Some(String::new())).unwrap_err();
    assert!(matches!(err, FeedError::Config(ref msg) if msg.contains("REFRESH_SECRET")));
}

#[tokio::test]
async fn test_push_sends_bearer_token_and_collection() {
    let (url, server) = one_shot_server("200 OK", r#"{"upserted":0,"disappeared":0}"#).await;
    let config = PushConfig::from_parts(Some(url), Some("s3cret".to_string())).unwrap();

    let reply = push(&reqwest::Client::new(), &FeatureCollection::new(Vec::new()), &config)
        .await
        .unwrap();
    assert_eq!(reply["upserted"], 0);

    let request = server.await.unwrap();
    let lowered = request.to_lowercase();
    assert!(request.starts_with("POST /api/listings/refresh"));
    assert!(lowered.contains("authorization: bearer s3cret"));
    assert!(request.contains(r#"{"type":"FeatureCollection","features":[]}"#));
}

#[tokio::test]
async fn test_non_200_reply_is_rejected() {
    let (url, server) = one_shot_server("401 Unauthorized", r#"{"error":"bad token"}"#).await;
    let config = PushConfig::from_parts(Some(url), Some("wrong".to_string())).unwrap();

    let err = push(&reqwest::Client::new(), &FeatureCollection::new(Vec::new()), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::PushRejected { status: 401, ref body } if body.contains("bad token")));
    server.await.unwrap();
}
