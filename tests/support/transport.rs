// ABOUTME: Scripted HttpTransport fake that records requests and answers from a closure.
// ABOUTME: Lets gateway and adapter tests assert on the exact requests issued.

use async_trait::async_trait;
use bytes::Bytes;
use d2ship::error::Error;
use d2ship::fetch::{HttpRequest, HttpResponse, HttpTransport};
use parking_lot::Mutex;
use std::sync::Arc;

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, Error> + Send + Sync>;

pub struct ScriptedTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responder: Responder,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse, Error> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Answers every request with an empty 200.
    pub fn ok() -> Arc<Self> {
        Self::new(|_| Ok(empty(200, "OK")))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let response = (self.responder)(&request);
        self.requests.lock().push(request);
        response
    }
}

pub fn json(value: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        status_text: "OK".to_string(),
        body: Bytes::from(value.to_string()),
    }
}

pub fn text(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        status_text: "OK".to_string(),
        body: Bytes::from(body.to_string()),
    }
}

pub fn empty(status: u16, status_text: &str) -> HttpResponse {
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        body: Bytes::new(),
    }
}

/// JSON body of a recorded request.
pub fn body(request: &HttpRequest) -> serde_json::Value {
    request
        .body
        .as_deref()
        .map(|b| serde_json::from_slice(b).unwrap())
        .unwrap_or(serde_json::Value::Null)
}
