use super::*;
use folio_core::Cause;
use folio_core::Failure;
use folio_core::Settings;
use folio_core::Upstream;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Outbound client for the document-processing service.
///
/// Upload failures carry whatever the peer said. Chat failures never do.
#[derive(Clone)]
pub struct Relay {
    client: reqwest::Client,
    base: String,
    upload_timeout: Duration,
    chat_timeout: Duration,
}

impl Relay {
    pub fn new(base: &str, upload_timeout: Duration, chat_timeout: Duration) -> Result<Self, Failure> {
        reqwest::Client::builder()
            .build()
            .map_err(Failure::internal)
            .map(|client| Self {
                client,
                base: base.trim_end_matches('/').to_string(),
                upload_timeout,
                chat_timeout,
            })
    }
    pub fn from_settings(settings: &Settings) -> Result<Self, Failure> {
        Self::new(
            &settings.processor_url,
            settings.upload_timeout,
            settings.chat_timeout,
        )
    }
    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn forward_upload(
        &self,
        upload: Upload,
        cancel: &CancellationToken,
    ) -> Result<Value, Failure> {
        let edit_mode = upload.edit_mode().to_string();
        let file = upload.file.ok_or(Failure::NoFileProvided)?;
        log::info!(
            "upload → {} ({} bytes, {}, edit_mode={})",
            file.filename(),
            file.len(),
            file.content_type(),
            edit_mode
        );
        let form = Form::new()
            .part("file", part(file)?)
            .text("edit_mode", edit_mode);
        let request = self
            .client
            .post(format!("{}/upload", self.base))
            .multipart(form)
            .timeout(self.upload_timeout);
        let (status, body) = exchange(request, cancel).await?;
        match status.is_success() {
            true => Ok(parse(&body).unwrap_or_else(|| text(&body))),
            false => Err(Upstream::new(Cause::Status(status.as_u16()))
                .with_detail(parse(&body).unwrap_or_else(|| text(&body)))
                .into()),
        }
    }

    pub async fn forward_chat(&self, chat: &Chat, cancel: &CancellationToken) -> Result<Value, Failure> {
        let (session, _) = chat.required()?;
        log::info!("chat → session {}", session);
        let request = self
            .client
            .post(format!("{}/chat", self.base))
            .json(chat)
            .timeout(self.chat_timeout);
        let (status, body) = exchange(request, cancel).await.map_err(Upstream::redacted)?;
        if !status.is_success() {
            log::warn!("chat upstream returned {}: {}", status, String::from_utf8_lossy(&body));
            return Err(Upstream::new(Cause::Status(status.as_u16())).into());
        }
        parse(&body)
            .and_then(|mut value| value.get_mut("answer").map(Value::take))
            .ok_or_else(|| Upstream::new(Cause::Malformed).into())
    }
}

fn part(file: Attachment) -> Result<Part, Failure> {
    let filename = file.filename().to_string();
    let content_type = file.content_type().to_string();
    Part::bytes(file.into_bytes())
        .file_name(filename)
        .mime_str(&content_type)
        .map_err(|_| Failure::Validation("Unsupported file content type"))
}

/// Sends the request and reads the whole body, abandoning both on cancel.
async fn exchange(
    request: reqwest::RequestBuilder,
    cancel: &CancellationToken,
) -> Result<(reqwest::StatusCode, Vec<u8>), Upstream> {
    let response = race(cancel, request.send()).await?;
    let status = response.status();
    let body = race(cancel, response.bytes()).await?;
    Ok((status, body.to_vec()))
}

async fn race<T, F>(cancel: &CancellationToken, future: F) -> Result<T, Upstream>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log::info!("relay cancelled by caller");
            Err(Upstream::new(Cause::Cancelled))
        }
        result = future => result.map_err(transport),
    }
}

fn transport(e: reqwest::Error) -> Upstream {
    let cause = match e.is_timeout() {
        true => Cause::Timeout,
        false => Cause::Unreachable,
    };
    log::warn!("relay transport error ({:?}): {}", cause, e);
    Upstream::new(cause).with_detail(Value::String(e.to_string()))
}

fn parse(body: &[u8]) -> Option<Value> {
    serde_json::from_slice(body).ok()
}

fn text(body: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn relay(server: &MockServer) -> Relay {
        Relay::new(
            &server.base_url(),
            Duration::from_secs(5),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn pdf() -> Attachment {
        Attachment::new(b"%PDF-1.4 body".to_vec(), "resume.pdf", None)
    }

    #[tokio::test]
    async fn upload_without_file_never_calls_out() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;
        let result = relay(&server)
            .forward_upload(Upload::default(), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(Failure::NoFileProvided)));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn upload_defaults_edit_mode_and_passes_json_through() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload")
                    .body_contains("name=\"edit_mode\"\r\n\r\nminimal\r\n")
                    .body_contains("filename=\"resume.pdf\"")
                    .body_contains("application/pdf")
                    .body_contains("%PDF-1.4 body");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"pages":3,"result":"ok"}"#);
            })
            .await;
        let value = relay(&server)
            .forward_upload(Upload::new(pdf()), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, json!({ "pages": 3, "result": "ok" }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_forwards_explicit_edit_mode() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload")
                    .body_contains("name=\"edit_mode\"\r\n\r\naggressive\r\n");
                then.status(200).body("{}");
            })
            .await;
        relay(&server)
            .forward_upload(
                Upload::new(pdf()).with_edit_mode("aggressive"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_failure_carries_downstream_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/upload");
                then.status(422).body(r#"{"detail":"unreadable pdf"}"#);
            })
            .await;
        let failure = relay(&server)
            .forward_upload(Upload::new(pdf()), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(failure.status(), 500);
        assert_eq!(
            failure.body(),
            json!({ "message": "AI processing failed", "error": { "detail": "unreadable pdf" } })
        );
    }

    #[tokio::test]
    async fn upload_failure_with_text_body_keeps_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/upload");
                then.status(502).body("bad gateway");
            })
            .await;
        let failure = relay(&server)
            .forward_upload(Upload::new(pdf()), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(failure.body()["error"], json!("bad gateway"));
    }

    #[tokio::test]
    async fn unreachable_peer_is_upstream_failure() {
        let relay = Relay::new("http://127.0.0.1:9", Duration::from_secs(5), Duration::from_secs(5)).unwrap();
        let failure = relay
            .forward_upload(Upload::new(pdf()), &CancellationToken::new())
            .await
            .unwrap_err();
        match failure {
            Failure::Upstream(upstream) => {
                assert_eq!(upstream.cause(), Cause::Unreachable);
                assert!(upstream.detail().is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn chat_with_empty_message_never_calls_out() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;
        let result = relay(&server)
            .forward_chat(&Chat::new("s1", ""), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(Failure::Validation(_))));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn chat_returns_only_the_answer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .json_body(json!({ "session_id": "s1", "message": "hello" }));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({ "answer": "hi there", "tokens": 12 }));
            })
            .await;
        let answer = relay(&server)
            .forward_chat(&Chat::new("s1", "hello"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(answer, json!("hi there"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_failure_is_redacted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(500).body(r#"{"trace":"secret internals"}"#);
            })
            .await;
        let failure = relay(&server)
            .forward_chat(&Chat::new("s1", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(failure.body(), json!({ "message": "AI processing failed" }));
    }

    #[tokio::test]
    async fn chat_without_answer_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(200).json_body(json!({ "reply": "wrong shape" }));
            })
            .await;
        let failure = relay(&server)
            .forward_chat(&Chat::new("s1", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();
        match failure {
            Failure::Upstream(upstream) => assert_eq!(upstream.cause(), Cause::Malformed),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_peer_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({ "answer": "late" }));
            })
            .await;
        let relay = Relay::new(
            &server.base_url(),
            Duration::from_secs(5),
            Duration::from_millis(200),
        )
        .unwrap();
        let failure = relay
            .forward_chat(&Chat::new("s1", "hello"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(failure.body(), json!({ "message": "AI processing timed out" }));
        match failure {
            Failure::Upstream(upstream) => assert_eq!(upstream.cause(), Cause::Timeout),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancellation_abandons_the_call() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/upload");
                then.status(200).delay(Duration::from_secs(3)).body("{}");
            })
            .await;
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });
        let started = std::time::Instant::now();
        let failure = relay(&server)
            .forward_upload(Upload::new(pdf()), &cancel)
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(2));
        match failure {
            Failure::Upstream(upstream) => assert_eq!(upstream.cause(), Cause::Cancelled),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn base_loses_trailing_slash() {
        let relay = Relay::new("http://peer:8000/", Duration::ZERO, Duration::ZERO).unwrap();
        assert_eq!(relay.base(), "http://peer:8000");
    }
}
