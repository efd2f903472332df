//! Locally-resolvable handles over in-memory binary content.
//!
//! A [`BlobUrl`] is what a front end hands to its preview widget or audio
//! player: an opaque `blob:doc2speech/<uuid>` string that [`BlobRegistry`]
//! resolves back to the bytes. Handles live until explicitly revoked, so
//! whoever creates one owns its release. The controller revokes preview
//! handles on replace and remove, result handles when superseded, and all
//! of them on teardown.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use uuid::Uuid;

const SCHEME_PREFIX: &str = "blob:doc2speech/";

/// Opaque handle to content held by a [`BlobRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobUrl(String);

impl BlobUrl {
    fn fresh() -> Self {
        Self(format!("{SCHEME_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content behind a handle.
#[derive(Debug, Clone)]
pub struct Blob {
    pub media_type: String,
    pub data: Bytes,
}

/// Shared table of live handles. Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    entries: Arc<Mutex<HashMap<BlobUrl, Blob>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content and return a fresh handle for it.
    pub fn create(&self, media_type: impl Into<String>, data: Bytes) -> BlobUrl {
        let url = BlobUrl::fresh();
        let blob = Blob {
            media_type: media_type.into(),
            data,
        };
        debug!("blob created: {} ({} bytes)", url, blob.data.len());
        self.lock().insert(url.clone(), blob);
        url
    }

    pub fn resolve(&self, url: &BlobUrl) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Release a handle. Returns `false` if it was already released.
    pub fn revoke(&self, url: &BlobUrl) -> bool {
        let removed = self.lock().remove(url).is_some();
        if removed {
            debug!("blob revoked: {}", url);
        }
        removed
    }

    /// Number of handles not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<BlobUrl, Blob>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let reg = BlobRegistry::new();
        let url = reg.create("application/pdf", Bytes::from_static(b"%PDF"));
        assert!(url.as_str().starts_with(SCHEME_PREFIX));

        let blob = reg.resolve(&url).expect("live handle resolves");
        assert_eq!(blob.media_type, "application/pdf");
        assert_eq!(&blob.data[..], b"%PDF");
        assert_eq!(reg.live_count(), 1);

        assert!(reg.revoke(&url));
        assert!(!reg.revoke(&url));
        assert!(reg.resolve(&url).is_none());
        assert_eq!(reg.live_count(), 0);
    }

    #[test]
    fn handles_are_unique() {
        let reg = BlobRegistry::new();
        let data = Bytes::from_static(b"same");
        let a = reg.create("audio/mpeg", data.clone());
        let b = reg.create("audio/mpeg", data);
        assert_ne!(a, b);
        assert_eq!(reg.live_count(), 2);
    }

    #[test]
    fn clones_share_the_table() {
        let reg = BlobRegistry::new();
        let other = reg.clone();
        let url = reg.create("audio/wav", Bytes::from_static(b"RIFF"));
        assert!(other.resolve(&url).is_some());
        other.revoke(&url);
        assert_eq!(reg.live_count(), 0);
    }
}
