//! The privileged-editing gate.
//!
//! Decided once at startup and passed explicitly to everything that writes
//! overrides or offers dragging. Nothing else inspects the environment.

use url::{form_urlencoded, Url};

/// Whether the current session may reposition notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    #[default]
    ReadOnly,
    Privileged,
}

impl Capability {
    /// Derive the capability from a page address or bare query string.
    ///
    /// Privileged only when `admin=1` and `key=<secret>` are both present.
    /// Without a configured secret nobody is privileged.
    pub fn from_query(query: &str, secret: Option<&str>) -> Self {
        let Some(secret) = secret.filter(|s| !s.is_empty()) else {
            return Self::ReadOnly;
        };

        let pairs: Vec<(String, String)> = match Url::parse(query) {
            Ok(url) => url.query_pairs().into_owned().collect(),
            Err(_) => form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .into_owned()
                .collect(),
        };

        let value = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };

        if value("admin") == Some("1") && value("key") == Some(secret) {
            Self::Privileged
        } else {
            Self::ReadOnly
        }
    }

    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Privileged)
    }
}
