//! Release registry lookups.
//!
//! The registry is the GitHub releases API: `GET /repos/<repo>/releases/latest`
//! returns a JSON document whose `tag_name` is the newest published version.
//! Lookups are never retried; a timeout or a bad status is reported as
//! [`UpgradeErrorKind::Network`](crate::core::UpgradeErrorKind::Network).

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use crate::core::UpgradeError;
use crate::upgrade::release::{ReleaseDescriptor, ReleaseEndpoints, VersionTag};

/// Client for the release registry.
#[derive(Debug, Clone)]
pub struct ReleaseRegistry {
    client: Client,
    endpoints: ReleaseEndpoints,
}

impl ReleaseRegistry {
    /// Create a registry client for `endpoints`.
    ///
    /// `client` should carry the network timeout; see
    /// [`http_client`](crate::upgrade::http_client).
    #[must_use]
    pub const fn new(client: Client, endpoints: ReleaseEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Query the tag of the latest published release.
    pub async fn latest_version(&self) -> Result<VersionTag, UpgradeError> {
        let url = self.endpoints.latest_release_url();
        debug!("Fetching latest release from {url}");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| UpgradeError::Network {
                url: url.clone(),
                source,
            })?;

        let body = response.bytes().await.map_err(|source| UpgradeError::Network {
            url: url.clone(),
            source,
        })?;

        let tag = parse_latest_tag(&url, &body)?;
        debug!("Latest release is {tag}");
        Ok(tag)
    }

    /// Describe a release of `tag` at this registry's download location.
    #[must_use]
    pub fn descriptor_for(&self, tag: VersionTag) -> ReleaseDescriptor {
        ReleaseDescriptor::new(&self.endpoints, tag)
    }
}

fn parse_latest_tag(url: &str, body: &[u8]) -> Result<VersionTag, UpgradeError> {
    let parse_error = |reason: String| UpgradeError::Parse {
        url: url.to_string(),
        reason,
    };

    let document: Value =
        serde_json::from_slice(body).map_err(|e| parse_error(format!("invalid JSON: {e}")))?;

    match document.get("tag_name") {
        Some(Value::String(tag)) => Ok(VersionTag::from(tag.as_str())),
        Some(other) => Err(parse_error(format!("tag_name is not a string: {other}"))),
        None => Err(parse_error("response has no tag_name".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.github.com/repos/mikeb26/bashgpt/releases/latest";

    #[test]
    fn test_parse_tag() {
        let body = br#"{"tag_name": "v1.3.0", "name": "bashgpt v1.3.0", "assets": []}"#;
        assert_eq!(parse_latest_tag(URL, body).unwrap(), VersionTag::from("v1.3.0"));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_latest_tag(URL, b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, UpgradeError::Parse { .. }));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_parse_rejects_missing_tag() {
        let err = parse_latest_tag(URL, br#"{"message": "Not Found"}"#).unwrap_err();
        assert!(err.to_string().contains("no tag_name"));
    }

    #[test]
    fn test_parse_rejects_non_string_tag() {
        let err = parse_latest_tag(URL, br#"{"tag_name": 130}"#).unwrap_err();
        assert!(err.to_string().contains("not a string"));
    }

    #[test]
    fn test_parse_keeps_tag_as_published() {
        let body = br#"{"tag_name": " v1.3.0\n"}"#;
        assert_eq!(parse_latest_tag(URL, body).unwrap().as_str(), " v1.3.0\n");
        assert_ne!(parse_latest_tag(URL, body).unwrap(), VersionTag::from("v1.3.0"));

        assert_eq!(parse_latest_tag(URL, br#"{"tag_name": ""}"#).unwrap().as_str(), "");
    }
}
