//! HTTP transport used to talk to the provider.
//!
//! Provider logic only sees [`ProviderTransport`], so tests can replace the
//! network with canned responses.

use std::time::Duration;

use arkstorm_common::error::{ArkstormError, ArkstormResult};

/// A fully-read HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,

    /// Every `Set-Cookie` header value, in received order.
    pub set_cookies: Vec<String>,

    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Fail with a fetch error unless the status is 2xx.
    pub fn ensure_ok(self, url: &str) -> ArkstormResult<Self> {
        self.ensure_status(url, 200..300)
    }

    /// Like [`ensure_ok`](Self::ensure_ok) but also accepts 3xx. The login
    /// form answers with a redirect that carries the session cookies.
    pub fn ensure_ok_or_redirect(self, url: &str) -> ArkstormResult<Self> {
        self.ensure_status(url, 200..400)
    }

    fn ensure_status(self, url: &str, accepted: std::ops::Range<u16>) -> ArkstormResult<Self> {
        if accepted.contains(&self.status) {
            Ok(self)
        } else {
            Err(ArkstormError::fetch(
                url,
                format!("unexpected HTTP status {}", self.status),
            ))
        }
    }
}

/// Abstract interface for provider HTTP calls.
#[async_trait::async_trait]
pub trait ProviderTransport: Send + Sync {
    /// POST `body` with the given headers.
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: Vec<(String, String)>,
    ) -> ArkstormResult<HttpResponse>;

    /// GET a resource.
    async fn get(&self, url: &str) -> ArkstormResult<HttpResponse>;
}

/// `reqwest`-backed transport.
///
/// Redirects are not followed: the login endpoint sets the session cookie on
/// the first response.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ArkstormResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("arkstorm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ArkstormError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    async fn read(url: &str, response: reqwest::Response) -> ArkstormResult<HttpResponse> {
        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ArkstormError::fetch(url, format!("failed reading body: {e}")))?
            .to_vec();

        tracing::debug!(url, status, bytes = body.len(), "Provider response");
        Ok(HttpResponse {
            status,
            set_cookies,
            body,
        })
    }
}

#[async_trait::async_trait]
impl ProviderTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: Vec<(String, String)>,
    ) -> ArkstormResult<HttpResponse> {
        let mut request = self.http.post(url).body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ArkstormError::fetch(url, e.to_string()))?;
        Self::read(url, response).await
    }

    async fn get(&self, url: &str) -> ArkstormResult<HttpResponse> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ArkstormError::fetch(url, e.to_string()))?;
        Self::read(url, response).await
    }
}
