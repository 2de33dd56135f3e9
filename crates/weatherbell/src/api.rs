//! Image API requests shared by cycle and frame listing.

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::view::View;
use serde::Serialize;

use crate::session::SessionToken;
use crate::transport::ProviderTransport;

#[derive(Debug, Serialize)]
pub(crate) struct ImageApiRequest<'a> {
    pub action: &'a str,
    #[serde(rename = "type")]
    pub viewtype: &'a str,
    pub product: &'a str,
    pub domain: &'a str,
    pub param: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<String>,
}

impl<'a> ImageApiRequest<'a> {
    pub fn new(action: &'a str, view: &'a View) -> Self {
        Self {
            action,
            viewtype: &view.viewtype,
            product: &view.product,
            domain: &view.region,
            param: &view.parameter,
            init: None,
        }
    }
}

/// POST a request to the image API and decode a JSON string array.
pub(crate) async fn post_string_list<T: ProviderTransport + ?Sized>(
    transport: &T,
    url: &str,
    session: &SessionToken,
    request: &ImageApiRequest<'_>,
) -> ArkstormResult<Vec<String>> {
    let body = serde_json::to_vec(request)?;
    let response = transport
        .post(
            url,
            body,
            vec![
                ("cookie".to_string(), session.cookie_header()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
        )
        .await?
        .ensure_ok(url)?;

    parse_string_list(&response.body)
}

/// Decode a JSON array of strings, failing on anything else.
pub(crate) fn parse_string_list(body: &[u8]) -> ArkstormResult<Vec<String>> {
    serde_json::from_slice::<Vec<String>>(body).map_err(|e| {
        let preview: String = String::from_utf8_lossy(body).chars().take(80).collect();
        ArkstormError::parse(format!(
            "expected JSON string array from image API: {e} (body starts: {preview:?})"
        ))
    })
}
