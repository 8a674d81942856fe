mod client;
mod live;

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use r2sign_core::time::parse_rfc3339;
use r2sign_core::{Context, FixedClock, HttpSend, Result};
use r2sign_r2::{ObjectClient, StorageConfig};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What a mock transport saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub uri: http::Uri,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

/// HttpSend that records every request and replays canned responses in order.
///
/// Once the queue is drained every request gets `200 OK` with an empty body.
#[derive(Debug, Clone, Default)]
pub struct RecordingHttpSend {
    responses: Arc<Mutex<VecDeque<(StatusCode, Bytes)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingHttpSend {
    pub fn respond(self, status: StatusCode, body: &'static str) -> Self {
        self.responses
            .lock()
            .expect("lock must not be poisoned")
            .push_back((status, Bytes::from_static(body.as_bytes())));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("lock must not be poisoned")
            .clone()
    }
}

#[async_trait]
impl HttpSend for RecordingHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests
            .lock()
            .expect("lock must not be poisoned")
            .push(RecordedRequest {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                body,
            });
        let (status, body) = self
            .responses
            .lock()
            .expect("lock must not be poisoned")
            .pop_front()
            .unwrap_or((StatusCode::OK, Bytes::new()));

        Ok(http::Response::builder()
            .status(status)
            .body(body)
            .expect("response must be valid"))
    }
}

/// Build a client over a recording transport with a pinned clock.
pub fn init_mock_client(http: RecordingHttpSend) -> ObjectClient {
    let _ = env_logger::builder().is_test(true).try_init();

    let now = parse_rfc3339("2024-01-01T00:00:00Z").expect("time must be valid");
    let ctx = Context::new()
        .with_http_send(http)
        .with_file_read(r2sign_file_read_tokio::TokioFileRead)
        .with_clock(FixedClock(now));

    ObjectClient::new(ctx, StorageConfig::new("acct1", "ak", "secret", "b"))
}
