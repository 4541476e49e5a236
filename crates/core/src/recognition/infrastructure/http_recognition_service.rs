use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::capture::captured_still::CapturedStill;
use crate::recognition::domain::recognition_outcome::{RecognitionOutcome, RegisterReply};
use crate::recognition::domain::recognition_service::RecognitionService;
use crate::shared::constants::{
    RECOGNIZE_ENDPOINT, REGISTER_ENDPOINT, STILL_FILE_NAME, STILL_MIME_TYPE,
};
use crate::shared::error::ClientError;

/// Error body of a non-2xx answer. `detail` is usually a string, but
/// validation failures can carry structured detail.
#[derive(Deserialize)]
struct ErrorReply {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Talks to the service over HTTP with multipart uploads.
///
/// `POST {base}/register` carries `image` + `name`; `POST {base}/recognize`
/// carries `image`. No request timeout is applied.
pub struct HttpRecognitionService {
    client: Client,
    base_url: Url,
}

impl HttpRecognitionService {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::Network(format!("invalid server URL '{base_url}': {e}")))?;

        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Network(format!("invalid endpoint '{path}': {e}")))
    }

    fn post(&self, path: &str, form: Form) -> Result<Response, ClientError> {
        let url = self.endpoint(path)?;
        log::debug!("POST {url}");
        self.client
            .post(url)
            .multipart(form)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))
    }
}

impl RecognitionService for HttpRecognitionService {
    fn register(&self, name: &str, still: &CapturedStill) -> Result<RegisterReply, ClientError> {
        let form = Form::new()
            .part("image", still_part(still)?)
            .text("name", name.to_string());
        read_reply(self.post(REGISTER_ENDPOINT, form)?)
    }

    fn recognize(&self, still: &CapturedStill) -> Result<RecognitionOutcome, ClientError> {
        let form = Form::new().part("image", still_part(still)?);
        read_reply(self.post(RECOGNIZE_ENDPOINT, form)?)
    }
}

fn still_part(still: &CapturedStill) -> Result<Part, ClientError> {
    Part::bytes(still.encoded_image.clone())
        .file_name(STILL_FILE_NAME)
        .mime_str(STILL_MIME_TYPE)
        .map_err(|e| ClientError::Network(e.to_string()))
}

fn read_reply<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .map_err(|e| ClientError::Network(e.to_string()))?;
    parse_reply(status, &body)
}

/// Interprets a service answer: 2xx bodies must decode as `T`; anything
/// else becomes a [`ClientError::Service`] carrying the `detail` text when
/// the body has a usable one.
fn parse_reply<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ClientError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body)
            .map_err(|e| ClientError::Network(format!("unreadable response (HTTP {status}): {e}")));
    }

    let detail = serde_json::from_slice::<ErrorReply>(body)
        .ok()
        .and_then(|reply| reply.detail)
        .and_then(|detail| match detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        })
        .filter(|text| !text.is_empty());
    log::warn!(
        "Service answered HTTP {status}: {}",
        detail.as_deref().unwrap_or("<no detail>")
    );
    Err(ClientError::Service { status, detail })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serves exactly one request with a canned answer and hands back the
    /// raw request bytes.
    fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, crossbeam_channel::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        let (tx, rx) = crossbeam_channel::bounded(1);

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            let mut chunked = false;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let lower = line.to_ascii_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                    chunked = true;
                }
                head.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }

            let mut body_bytes = Vec::new();
            if chunked {
                loop {
                    let mut size_line = String::new();
                    reader.read_line(&mut size_line).unwrap();
                    let size = usize::from_str_radix(size_line.trim(), 16).unwrap();
                    let mut chunk = vec![0u8; size + 2];
                    reader.read_exact(&mut chunk).unwrap();
                    if size == 0 {
                        break;
                    }
                    body_bytes.extend_from_slice(&chunk[..size]);
                }
            } else {
                body_bytes.resize(content_length, 0);
                reader.read_exact(&mut body_bytes).unwrap();
            }

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            let raw = format!("{head}{}", String::from_utf8_lossy(&body_bytes));
            let _ = tx.send(raw);
        });

        (base, rx)
    }

    fn still() -> CapturedStill {
        CapturedStill::new(vec![0xFF, 0xD8, 0xFF, 0xD9], 640, 480)
    }

    fn received(rx: &crossbeam_channel::Receiver<String>) -> String {
        rx.recv_timeout(Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_register_posts_multipart_image_and_name() {
        let (base, rx) = one_shot_server("HTTP/1.1 200 OK", r#"{"message": "Alice registered"}"#);
        let service = HttpRecognitionService::new(&base).unwrap();

        let reply = service.register("Alice", &still()).unwrap();

        assert_eq!(reply.message, "Alice registered");
        let raw = received(&rx);
        assert!(raw.starts_with("POST /register HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("multipart/form-data"));
        assert!(raw.contains(r#"name="image"; filename="face.jpg""#));
        assert!(raw.contains("image/jpeg"));
        assert!(raw.contains(r#"name="name""#));
        assert!(raw.contains("Alice"));
    }

    #[test]
    fn test_recognize_posts_image_only_and_parses_outcome() {
        let (base, rx) = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"face_detected": true, "recognized": true, "name": "Alice", "confidence": 0.87, "num_landmarks": 68, "face_location": {"top": 100, "left": 50, "width": 80, "height": 80}}"#,
        );
        let service = HttpRecognitionService::new(&base).unwrap();

        let outcome = service.recognize(&still()).unwrap();

        assert!(outcome.recognized);
        assert_eq!(outcome.name.as_deref(), Some("Alice"));
        assert_eq!(outcome.num_landmarks, Some(68));
        let raw = received(&rx);
        assert!(raw.starts_with("POST /recognize HTTP/1.1"));
        assert!(raw.contains(r#"name="image"; filename="face.jpg""#));
        assert!(!raw.contains(r#"name="name""#));
    }

    #[test]
    fn test_non_success_carries_server_detail() {
        let (base, _rx) =
            one_shot_server("HTTP/1.1 400 Bad Request", r#"{"detail": "duplicate name"}"#);
        let service = HttpRecognitionService::new(&base).unwrap();

        let err = service.register("Alice", &still()).unwrap_err();

        assert_eq!(
            err,
            ClientError::Service {
                status: 400,
                detail: Some("duplicate name".to_string()),
            }
        );
    }

    #[test]
    fn test_non_success_without_body_has_no_detail() {
        let (base, _rx) = one_shot_server("HTTP/1.1 500 Internal Server Error", "");
        let service = HttpRecognitionService::new(&base).unwrap();

        let err = service.recognize(&still()).unwrap_err();

        assert_eq!(
            err,
            ClientError::Service {
                status: 500,
                detail: None,
            }
        );
    }

    #[test]
    fn test_base_url_path_is_kept() {
        let (base, rx) = one_shot_server("HTTP/1.1 200 OK", r#"{"face_detected": false}"#);
        let service = HttpRecognitionService::new(&format!("{base}api")).unwrap();

        service.recognize(&still()).unwrap();

        assert!(received(&rx).starts_with("POST /api/recognize HTTP/1.1"));
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let service = HttpRecognitionService::new(&format!("http://{addr}/")).unwrap();

        let err = service.recognize(&still()).unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpRecognitionService::new("not a url"),
            Err(ClientError::Network(_))
        ));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let service = HttpRecognitionService::new("http://example.com/faces").unwrap();
        assert_eq!(service.base_url().as_str(), "http://example.com/faces/");
    }

    // ── Reply interpretation ─────────────────────────────────────────

    #[test]
    fn test_parse_success_body() {
        let reply: RegisterReply = parse_reply(201, br#"{"message": "ok"}"#).unwrap();
        assert_eq!(reply.message, "ok");
    }

    #[test]
    fn test_parse_unreadable_success_body_is_network_error() {
        let err = parse_reply::<RegisterReply>(200, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[rstest]
    #[case::string_detail(br#"{"detail": "no face found"}"#.as_slice(), Some("no face found"))]
    #[case::empty_detail(br#"{"detail": ""}"#.as_slice(), None)]
    #[case::null_detail(br#"{"detail": null}"#.as_slice(), None)]
    #[case::missing_detail(br#"{"error": "x"}"#.as_slice(), None)]
    #[case::not_json(b"Internal Server Error".as_slice(), None)]
    #[case::structured_detail(br#"{"detail": [{"msg": "field required"}]}"#.as_slice(), Some(r#"[{"msg":"field required"}]"#))]
    fn test_parse_failure_detail(#[case] body: &[u8], #[case] expected: Option<&str>) {
        let err = parse_reply::<RegisterReply>(422, body).unwrap_err();
        assert_eq!(
            err,
            ClientError::Service {
                status: 422,
                detail: expected.map(str::to_string),
            }
        );
    }
}
