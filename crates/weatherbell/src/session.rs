//! Session login.

use std::sync::OnceLock;

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use regex::Regex;

use crate::transport::ProviderTransport;
use crate::Endpoints;

pub const ENV_USERNAME: &str = "WEATHERBELL_USERNAME";
pub const ENV_PASSWORD: &str = "WEATHERBELL_PASSWORD";
pub const ENV_SESSION_ID: &str = "WEATHERBELL_SESSION_ID";

/// Opaque provider session token (`PHPSESSID` value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `cookie` request header.
    pub fn cookie_header(&self) -> String {
        format!("PHPSESSID={}", self.0)
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from `WEATHERBELL_USERNAME` / `WEATHERBELL_PASSWORD`.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var(ENV_USERNAME).ok()?;
        let password = std::env::var(ENV_PASSWORD).ok()?;
        Some(Self { username, password })
    }
}

/// How the download stage obtains its session token.
#[derive(Debug, Clone)]
pub enum SessionSource {
    /// A token obtained elsewhere; no login request is made.
    Token(SessionToken),

    /// Log in with these credentials.
    Login(Credentials),

    /// Neither a token nor credentials are configured.
    Unavailable,
}

impl SessionSource {
    /// Prefer an explicit token, then `WEATHERBELL_SESSION_ID`, then
    /// credentials from the environment.
    pub fn resolve(configured_token: Option<&str>) -> Self {
        let token = configured_token
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_SESSION_ID).ok())
            .filter(|t| !t.trim().is_empty());

        match (token, Credentials::from_env()) {
            (Some(token), _) => Self::Token(SessionToken::new(token)),
            (None, Some(credentials)) => Self::Login(credentials),
            (None, None) => Self::Unavailable,
        }
    }

    /// Produce a session token, logging in if needed.
    pub async fn obtain<T: ProviderTransport + ?Sized>(
        &self,
        transport: &T,
        endpoints: &Endpoints,
    ) -> ArkstormResult<SessionToken> {
        match self {
            Self::Token(token) => Ok(token.clone()),
            Self::Login(credentials) => authenticate(transport, endpoints, credentials).await,
            Self::Unavailable => Err(ArkstormError::auth(format!(
                "no session id configured and {ENV_USERNAME}/{ENV_PASSWORD} are not set"
            ))),
        }
    }
}

/// Exchange credentials for a session token. Single attempt, no retry.
pub async fn authenticate<T: ProviderTransport + ?Sized>(
    transport: &T,
    endpoints: &Endpoints,
    credentials: &Credentials,
) -> ArkstormResult<SessionToken> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("username", &credentials.username)
        .append_pair("password", &credentials.password)
        .append_pair("remember_me", "1")
        .append_pair("do_login", "Login")
        .finish();

    tracing::info!(url = %endpoints.login_url, username = %credentials.username, "Logging in");
    let response = transport
        .post(
            &endpoints.login_url,
            body.into_bytes(),
            vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
        )
        .await?
        .ensure_ok_or_redirect(&endpoints.login_url)?;

    let token = extract_session_id(&response.set_cookies)?;
    tracing::info!("Obtained session token");
    Ok(token)
}

/// Pull the session token out of the login response cookies.
///
/// A rejected login sets at most one cookie, so fewer than two
/// `Set-Cookie` headers is treated as bad credentials.
pub fn extract_session_id(set_cookies: &[String]) -> ArkstormResult<SessionToken> {
    static SESSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = SESSION_RE.get_or_init(|| Regex::new(r"PHPSESSID=(\w+)").expect("valid regex"));

    if set_cookies.len() < 2 {
        return Err(ArkstormError::auth(
            "unable to get session id, likely invalid credentials",
        ));
    }

    re.captures(&set_cookies[0])
        .and_then(|caps| caps.get(1))
        .map(|m| SessionToken::new(m.as_str()))
        .ok_or_else(|| ArkstormError::auth("session cookie not found in login response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION_COOKIE: &str = "PHPSESSID=a3fd3b61d7db6d652d2c588bcd0b57a3; expires=Mon, 06-Feb-2023 06:02:36 GMT; Max-Age=604800; path=/; HTTPOnly; Secure; domain=.weatherbell.com; HttpOnly";

    #[test]
    fn test_extract_session_id_from_login_cookies() {
        let cookies = vec![
            SESSION_COOKIE.to_string(),
            SESSION_COOKIE.to_string(),
            "cookie=d1c9161b03480652bed0b3631515246b29e1aba29f2837d0b3d8eb9093822293; path=/".to_string(),
            "userid=lZ2cmD%2FLVNlB1ZcGVeDq3cVaQdI%2BsBHYtd00RFaf800%3D; path=/".to_string(),
        ];
        let token = extract_session_id(&cookies).unwrap();
        assert_eq!(token.as_str(), "a3fd3b61d7db6d652d2c588bcd0b57a3");
        assert_eq!(
            token.cookie_header(),
            "PHPSESSID=a3fd3b61d7db6d652d2c588bcd0b57a3"
        );
    }

    #[test]
    fn test_single_cookie_means_rejected_login() {
        let err = extract_session_id(&[SESSION_COOKIE.to_string()]).unwrap_err();
        assert!(matches!(err, ArkstormError::Auth { .. }));
    }

    #[test]
    fn test_missing_session_pattern_is_auth_error() {
        let cookies = vec!["a=b".to_string(), "c=d".to_string()];
        assert!(matches!(
            extract_session_id(&cookies),
            Err(ArkstormError::Auth { .. })
        ));
    }

    #[test]
    fn test_configured_token_wins() {
        match SessionSource::resolve(Some("abc123")) {
            SessionSource::Token(token) => assert_eq!(token.as_str(), "abc123"),
            other => panic!("unexpected session source: {other:?}"),
        }
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "forecaster".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("forecaster"));
        assert!(!debug.contains("hunter2"));
    }
}
