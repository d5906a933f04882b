// ABOUTME: Fetch gateway: one HTTP request/response cycle exposed as a Deferred.
// ABOUTME: Maps statuses to errors and retries a failed direct request once through the relay.

mod query;
mod transport;

pub use query::{build_query, with_query};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, HyperTransport};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::deferred::Deferred;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// How a request reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// Straight to the target URL.
    Direct,
    /// Through the configured CORS relay.
    Alternate,
}

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// JSON body, sent on POST.
    pub data: Option<serde_json::Value>,
    /// Return the body as text instead of parsing JSON.
    pub text_response: bool,
    pub params: Vec<(String, String)>,
    pub bearer: Option<String>,
    /// Overrides the gateway's default routing mode.
    pub routing: Option<RoutingMode>,
}

impl FetchOptions {
    pub fn with_data<B: Serialize>(data: &B) -> Result<Self, Error> {
        let data = serde_json::to_value(data)
            .map_err(|e| Error::InvalidResponse(format!("cannot encode request body: {e}")))?;
        Ok(Self {
            data: Some(data),
            ..Self::default()
        })
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}

/// A parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

impl Payload {
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| Error::InvalidResponse(e.to_string()))
            }
            Payload::Text(text) => serde_json::from_value(serde_json::Value::String(text))
                .map_err(|e| Error::InvalidResponse(e.to_string())),
        }
    }
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    default_routing: RoutingMode,
    cors_relay: Option<String>,
}

/// Issues requests through an [`HttpTransport`].
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct FetchGateway {
    inner: Arc<Inner>,
}

impl fmt::Debug for FetchGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchGateway")
            .field("default_routing", &self.inner.default_routing)
            .field("cors_relay", &self.inner.cors_relay)
            .finish()
    }
}

impl FetchGateway {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        default_routing: RoutingMode,
        cors_relay: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                default_routing,
                cors_relay: cors_relay.map(|r| r.trim_end_matches('/').to_string()),
            }),
        }
    }

    /// Gateway on the hyper transport, routed as the config says.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HyperTransport::new(config.timeout)),
            config.routing_mode(),
            config.cors_relay.clone(),
        )
    }

    pub fn default_routing(&self) -> RoutingMode {
        self.inner.default_routing
    }

    /// Issue a request.
    ///
    /// A request made in direct mode that fails for any reason (transport or
    /// status) is re-issued once in alternate mode and that outcome is
    /// returned. Alternate-mode failures are final.
    pub fn request(&self, method: Method, url: &str, options: FetchOptions) -> Deferred<Payload> {
        let mode = options.routing.unwrap_or(self.inner.default_routing);
        let attempt = self.attempt(method, url, &options, mode);

        match mode {
            RoutingMode::Alternate => attempt,
            RoutingMode::Direct => {
                let gateway = self.clone();
                let url = url.to_string();
                attempt.flat_map_error(move |err| {
                    warn!(%method, %url, error = %err, "direct request failed, retrying through relay");
                    gateway.attempt(method, &url, &options, RoutingMode::Alternate)
                })
            }
        }
    }

    pub fn get<T>(&self, url: &str) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.get_with(url, FetchOptions::default())
    }

    pub fn get_with<T>(&self, url: &str, options: FetchOptions) -> Deferred<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        decoded(self.request(Method::Get, url, options))
    }

    pub fn get_text(&self, url: &str, options: FetchOptions) -> Deferred<String> {
        let options = FetchOptions {
            text_response: true,
            ..options
        };
        decoded(self.request(Method::Get, url, options))
    }

    pub fn post<B, T>(&self, url: &str, body: &B) -> Deferred<T>
    where
        B: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        match FetchOptions::with_data(body) {
            Ok(options) => decoded(self.request(Method::Post, url, options)),
            Err(err) => Deferred::error(err),
        }
    }

    fn attempt(
        &self,
        method: Method,
        url: &str,
        options: &FetchOptions,
        mode: RoutingMode,
    ) -> Deferred<Payload> {
        let request = self.prepare(method, url, options, mode);
        let transport = Arc::clone(&self.inner.transport);
        let text_response = options.text_response;

        Deferred::new(move || async move {
            let request = request?;
            debug!(method = %request.method, url = %request.url, ?mode, "sending request");
            let response = transport.send(request).await?;
            debug!(status = response.status, "received response");

            if !response.is_success() {
                return Err(Error::Api {
                    status: response.status,
                    status_text: response.status_text,
                });
            }
            parse_body(&response.body, text_response)
        })
    }

    fn prepare(
        &self,
        method: Method,
        url: &str,
        options: &FetchOptions,
        mode: RoutingMode,
    ) -> Result<HttpRequest, Error> {
        let target = with_query(url, &options.params);
        let url = match (mode, &self.inner.cors_relay) {
            (RoutingMode::Alternate, Some(relay)) => format!("{relay}/{target}"),
            _ => target,
        };

        let mut headers = vec![("x-requested-with".to_string(), "XMLHttpRequest".to_string())];
        if method == Method::Post {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &options.bearer {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        let body = match (method, &options.data) {
            (Method::Post, Some(data)) => Some(
                serde_json::to_vec(data)
                    .map_err(|e| Error::InvalidResponse(format!("cannot encode request body: {e}")))?,
            ),
            _ => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

fn decoded<T>(payload: Deferred<Payload>) -> Deferred<T>
where
    T: DeserializeOwned + Send + 'static,
{
    payload.flat_map(|payload| match payload.decode() {
        Ok(value) => Deferred::success(value),
        Err(err) => Deferred::error(err),
    })
}

// Empty bodies decode as JSON null so unit responses succeed.
fn parse_body(body: &[u8], text_response: bool) -> Result<Payload, Error> {
    if text_response {
        return Ok(Payload::Text(String::from_utf8_lossy(body).into_owned()));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::Json(serde_json::Value::Null));
    }
    serde_json::from_slice(body)
        .map(Payload::Json)
        .map_err(|e| Error::InvalidResponse(e.to_string()))
}
