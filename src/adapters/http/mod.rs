//! HTTP adapter for the prediction server using `reqwest`.
//!
//! Implements `PredictionClient` against:
//! - `POST /api/predict` (multipart, single `image` field)
//! - `GET /health`
//! - `GET /api/model-info`

use std::time::Instant;

use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{join_endpoint, Config};
use crate::domain::{HealthStatus, ModelInfo, PredictionResult, SelectedFile};
use crate::ports::{PredictError, PredictionClient};

/// Multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Error body returned by the server on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Blocking HTTP client bound to one server base URL.
pub struct HttpPredictionClient {
    base_url: String,
    client: Client,
}

impl HttpPredictionClient {
    /// Build a client from startup configuration.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("amdscreen/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(config.api_url.clone(), client))
    }

    /// Wrap an already configured `reqwest` client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PredictError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .map_err(|e| PredictError::Transport(e.to_string()))?;
        read_json(response)
    }
}

impl PredictionClient for HttpPredictionClient {
    fn predict(&self, file: &SelectedFile) -> Result<PredictionResult, PredictError> {
        let url = self.endpoint("/api/predict");
        let part = multipart::Part::bytes(file.bytes().to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| PredictError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        tracing::debug!(%url, size = file.size(), content_type = %file.content_type, "Posting image");
        let started = Instant::now();

        // `multipart` sets `Content-Type: multipart/form-data; boundary=...`.
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        tracing::debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prediction response received"
        );
        read_json(response)
    }

    fn health(&self) -> Result<bool, PredictError> {
        let status: HealthStatus = self.get_json("/health")?;
        Ok(status.is_healthy())
    }

    fn model_info(&self) -> Result<ModelInfo, PredictError> {
        self.get_json("/api/model-info")
    }
}

/// Decode a 2xx body as `T`, or turn a non-2xx into `Rejected`.
fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, PredictError> {
    let status = response.status();
    let body = response
        .bytes()
        .map_err(|e| PredictError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());
        return Err(PredictError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| PredictError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;
    use crate::ports::GENERIC_PREDICTION_ERROR;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    const EARLY_RESPONSE: &str = r#"{"prediction":"Early AMD","confidence":0.82,"probabilities":{"Early AMD":0.82,"Intermediate AMD":0.12,"Late AMD":0.06},"amd_stage":"Early AMD"}"#;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Read one HTTP/1.1 request (headers plus sized or chunked body).
    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());

        if let Some(len) = content_length {
            while buf.len() < header_end + len {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
        } else if head.contains("transfer-encoding: chunked") {
            while !buf.ends_with(b"0\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve exactly one canned response; the join handle yields the request.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        (format!("http://{addr}"), handle)
    }

    fn client_for(base_url: String) -> HttpPredictionClient {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpPredictionClient::with_client(base_url, client)
    }

    fn sample_file() -> SelectedFile {
        SelectedFile::new("fundus_01.png", "image/png", b"\x89PNG fake payload".to_vec())
    }

    #[test]
    fn test_new_from_config() {
        let config = Config::from_lookup(|key| {
            (key == "AMDSCREEN_API_URL").then(|| "http://127.0.0.1:5000/".to_string())
        })
        .unwrap();
        let client = HttpPredictionClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_predict_success() {
        let (base, server) = serve_once("200 OK", EARLY_RESPONSE);
        let result = client_for(base).predict(&sample_file()).unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("POST /api/predict HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data; boundary="));
        assert!(request.contains("name=\"image\""));
        assert!(request.contains("filename=\"fundus_01.png\""));
        assert!(request.contains("fake payload"));

        assert_eq!(result.prediction, "Early AMD");
        assert_eq!(result.severity(), Severity::Low);
        assert_eq!(result.probabilities.len(), 3);
    }

    #[test]
    fn test_predict_rejected_with_server_message() {
        let (base, server) = serve_once("400 Bad Request", r#"{"error": "Invalid image format"}"#);
        let err = client_for(base).predict(&sample_file()).unwrap_err();
        server.join().unwrap();

        assert_eq!(
            err,
            PredictError::Rejected {
                status: 400,
                message: Some("Invalid image format".to_string())
            }
        );
        assert_eq!(err.user_message(), "Invalid image format");
    }

    #[test]
    fn test_predict_rejected_without_parseable_body() {
        let (base, server) = serve_once("500 Internal Server Error", "<html>oops</html>");
        let err = client_for(base).predict(&sample_file()).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, PredictError::Rejected { status: 500, message: None }));
        assert_eq!(err.user_message(), GENERIC_PREDICTION_ERROR);
    }

    #[test]
    fn test_predict_malformed_success_body() {
        let (base, server) = serve_once("200 OK", r#"{"status": "ok"}"#);
        let err = client_for(base).predict(&sample_file()).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, PredictError::MalformedResponse(_)));
        assert_eq!(err.user_message(), GENERIC_PREDICTION_ERROR);
    }

    #[test]
    fn test_predict_unreachable_server() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = client_for(format!("http://{addr}"))
            .predict(&sample_file())
            .unwrap_err();

        assert!(matches!(err, PredictError::Transport(_)));
        assert_eq!(err.user_message(), GENERIC_PREDICTION_ERROR);
    }

    #[test]
    fn test_health_and_model_info() {
        let (base, server) = serve_once("200 OK", r#"{"status": "healthy"}"#);
        assert!(client_for(base).health().unwrap());
        assert!(server.join().unwrap().starts_with("GET /health HTTP/1.1"));

        let (base, server) = serve_once(
            "200 OK",
            r#"{"model_loaded": true, "classes": ["Early", "Intermediate", "Late"], "model": "ResNet50", "input_size": "300x300", "preprocessing": "CLAHE", "version": "1.0"}"#,
        );
        let info = client_for(base).model_info().unwrap();
        assert!(server.join().unwrap().starts_with("GET /api/model-info HTTP/1.1"));
        assert_eq!(info.classes.len(), 3);
        assert_eq!(info.summary(), "ResNet50 v1.0");
    }
}
