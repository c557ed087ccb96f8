//! Shared-content capture
//!
//! The share surface hands the store an ordered set of content providers.
//! Extraction prefers the first plain-text provider; failing that, the
//! first URL provider's string form. Empty or whitespace-only results are
//! a non-fatal "nothing to save" outcome, never an error.

use crate::db::HighlightRepository;
use crate::error::Result;
use crate::models::Highlight;

/// Capability a content provider satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    PlainText,
    Url,
}

/// One piece of shared content offered by the host share pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentProvider {
    pub kind: ProviderKind,
    pub value: String,
}

impl ContentProvider {
    /// A provider satisfying the plain-text capability
    #[must_use]
    pub fn plain_text(value: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::PlainText,
            value: value.into(),
        }
    }

    /// A provider satisfying the URL capability
    #[must_use]
    pub fn url(value: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Url,
            value: value.into(),
        }
    }
}

/// Result of a capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A highlight was inserted and committed
    Saved(Highlight),
    /// Nothing usable was shared; no insert happened
    NoContent,
}

/// Extract the text to save from an ordered provider set.
///
/// First plain-text provider wins; otherwise the first URL provider's
/// string form. The result is trimmed; `None` when nothing non-empty
/// remains.
#[must_use]
pub fn extract_shared_text(providers: &[ContentProvider]) -> Option<String> {
    let raw = providers
        .iter()
        .find(|provider| provider.kind == ProviderKind::PlainText)
        .or_else(|| {
            providers
                .iter()
                .find(|provider| provider.kind == ProviderKind::Url)
        })
        .map(|provider| provider.value.as_str())?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Capture shared content into the store.
///
/// On a non-empty extraction the highlight is inserted and committed
/// through the caller's own connection; tags are trimmed and stored as-is.
pub fn capture_highlight(
    repo: &impl HighlightRepository,
    providers: &[ContentProvider],
    tags: &str,
) -> Result<CaptureOutcome> {
    let Some(text) = extract_shared_text(providers) else {
        return Ok(CaptureOutcome::NoContent);
    };

    let mut draft = repo.insert(&text, tags.trim());
    let saved = repo.save(&mut draft)?;
    tracing::info!("Captured highlight {}", saved.id);
    Ok(CaptureOutcome::Saved(saved))
}
