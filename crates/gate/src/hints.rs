//! Resource hints emitted after a rebuild.
//!
//! The gate doesn't touch the document itself; it hands a list of hint
//! directives to an injected sink. The sink has no error path — hint
//! insertion failures are not observable, so the trait can't report them.

/// How a resource should be hinted to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// `rel=preload`: the resource is needed for the current load.
    Preload,
    /// `rel=prefetch`: the resource is likely needed soon.
    Prefetch,
}

/// One preload/prefetch directive for a critical asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHint {
    pub kind: HintKind,
    pub href: String,
    /// The `as` attribute for preloads (style, script, image).
    pub as_attr: Option<&'static str>,
}

/// Destination for hint directives, typically the document head.
pub trait HintSink: Send + Sync {
    fn apply(&self, hints: &[ResourceHint]);
}

/// [`HintSink`] that only logs what would be inserted.
#[derive(Debug, Default)]
pub struct LogHints;

impl HintSink for LogHints {
    fn apply(&self, hints: &[ResourceHint]) {
        for hint in hints {
            tracing::debug!(kind = ?hint.kind, href = %hint.href, "resource hint");
        }
    }
}

/// Build hint directives for the configured critical asset list.
///
/// Stylesheets and scripts are preloaded with the matching `as` attribute;
/// everything else is prefetched.
pub fn hints_for(assets: &[String]) -> Vec<ResourceHint> {
    assets
        .iter()
        .map(|href| {
            let (kind, as_attr) = if href.ends_with(".css") {
                (HintKind::Preload, Some("style"))
            } else if href.ends_with(".js") {
                (HintKind::Preload, Some("script"))
            } else {
                (HintKind::Prefetch, None)
            };
            ResourceHint { kind, href: href.clone(), as_attr }
        })
        .collect()
}
