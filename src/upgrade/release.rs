//! Release identity: version tags, where releases live, and what this build is.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{COMMAND_NAME, DEV_VERSION, EMBEDDED_VERSION};
use crate::upgrade::config::UpgradeConfig;

/// A release version identifier such as `v1.3.0`.
///
/// Tags are opaque: two tags are the same release iff their strings are equal,
/// and no ordering is defined. A registry that reports an older tag than the
/// running one still counts as "different".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    /// Wrap a tag string.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as published.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the development-build sentinel.
    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.0 == DEV_VERSION
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for VersionTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// Where releases are looked up and downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEndpoints {
    /// Base URL of the registry API, e.g. `https://api.github.com`
    pub api_base: String,
    /// Base URL artifacts are downloaded from, e.g. `https://github.com`
    pub download_base: String,
    /// `owner/name` of the publishing repository
    pub repository: String,
    /// File name of the artifact attached to each release
    pub binary_name: String,
}

impl ReleaseEndpoints {
    /// Endpoints configured in the `[upgrade]` section.
    #[must_use]
    pub fn from_config(config: &UpgradeConfig) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            download_base: config.download_base.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            binary_name: COMMAND_NAME.to_string(),
        }
    }

    /// URL of the "latest release" document.
    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repository)
    }

    /// Download URL of the artifact for `tag`.
    #[must_use]
    pub fn download_url(&self, tag: &VersionTag) -> String {
        format!(
            "{}/{}/releases/download/{}/{}",
            self.download_base, self.repository, tag, self.binary_name
        )
    }
}

impl Default for ReleaseEndpoints {
    fn default() -> Self {
        Self::from_config(&UpgradeConfig::default())
    }
}

/// A published release: its tag and where to fetch its binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// Version of the release
    pub tag: VersionTag,
    /// URL of the binary artifact, derived from the tag
    pub download_url: String,
}

impl ReleaseDescriptor {
    /// Describe `tag` as published at `endpoints`.
    #[must_use]
    pub fn new(endpoints: &ReleaseEndpoints, tag: VersionTag) -> Self {
        let download_url = endpoints.download_url(&tag);
        Self { tag, download_url }
    }
}

/// Read-only facts about the running build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Name the command is invoked as
    pub command_name: String,
    /// Version compiled into this binary
    pub version: VersionTag,
    /// Where this build's releases are published
    pub endpoints: ReleaseEndpoints,
}

impl BuildInfo {
    /// The running build, publishing to the default endpoints.
    #[must_use]
    pub fn current() -> Self {
        Self {
            command_name: COMMAND_NAME.to_string(),
            version: VersionTag::from(EMBEDDED_VERSION),
            endpoints: ReleaseEndpoints::default(),
        }
    }

    /// Same build with different release endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: ReleaseEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Same build reporting a different embedded version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<VersionTag>) -> Self {
        self.version = version.into();
        self
    }

    /// Whether this binary was built outside the release pipeline.
    #[must_use]
    pub fn is_dev_build(&self) -> bool {
        self.version.is_dev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_compare_as_strings() {
        assert_eq!(VersionTag::from("v1.3.0"), VersionTag::from("v1.3.0"));
        assert_ne!(VersionTag::from("v1.3.0"), VersionTag::from("1.3.0"));
        assert!(VersionTag::from("v0.devbuild").is_dev());
    }

    #[test]
    fn test_tag_serializes_as_plain_string() {
        let json = serde_json::to_string(&VersionTag::from("v1.2.0")).unwrap();
        assert_eq!(json, "\"v1.2.0\"");
    }

    #[test]
    fn test_default_urls() {
        let endpoints = ReleaseEndpoints::default();
        assert_eq!(
            endpoints.latest_release_url(),
            "https://api.github.com/repos/mikeb26/bashgpt/releases/latest"
        );

        let release = ReleaseDescriptor::new(&endpoints, VersionTag::from("v1.3.0"));
        assert_eq!(
            release.download_url,
            "https://github.com/mikeb26/bashgpt/releases/download/v1.3.0/bashgpt"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = UpgradeConfig {
            api_base: "http://127.0.0.1:8080/".to_string(),
            download_base: "http://127.0.0.1:8080/".to_string(),
            ..UpgradeConfig::default()
        };
        let endpoints = ReleaseEndpoints::from_config(&config);
        assert_eq!(
            endpoints.latest_release_url(),
            "http://127.0.0.1:8080/repos/mikeb26/bashgpt/releases/latest"
        );
    }

    #[test]
    fn test_unreleased_build_is_dev() {
        let build = BuildInfo::current().with_version("v0.devbuild");
        assert!(build.is_dev_build());
        assert!(!build.with_version("v1.0.0").is_dev_build());
    }
}
