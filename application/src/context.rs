//! Propagation context
//!
//! Carries the current [`Entry`] and tracing span across call boundaries.
//! The entry slot is a typed field rather than a keyed lookup, so two
//! independently built loggers can never collide on it.

use crate::ports::entry::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::Span;

/// Immutable, cheaply clonable request context
///
/// Every `with_*` method returns a new context and leaves the receiver as
/// it was.
#[derive(Clone)]
pub struct Context {
    entry: Option<Arc<dyn Entry>>,
    span: Span,
}

impl Context {
    /// Empty root context with no entry and no span
    pub fn background() -> Self {
        Self {
            entry: None,
            span: Span::none(),
        }
    }

    /// Root context parented to the span the caller is currently in
    pub fn current() -> Self {
        Self {
            entry: None,
            span: Span::current(),
        }
    }

    /// The stored entry, or `None` if no entry was ever attached
    pub fn entry(&self) -> Option<Arc<dyn Entry>> {
        self.entry.clone()
    }

    pub fn with_entry(&self, entry: Arc<dyn Entry>) -> Self {
        Self {
            entry: Some(entry),
            span: self.span.clone(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn with_span(&self, span: Span) -> Self {
        Self {
            entry: self.entry.clone(),
            span,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("entry", &self.entry.as_ref().map(|e| e.get_values()))
            .field("span", &self.span)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::logger::NoLogger;

    #[test]
    fn test_background_has_no_entry() {
        let ctx = Context::background();
        assert!(ctx.entry().is_none());
        assert!(ctx.span().is_none());
    }

    #[test]
    fn test_with_entry_leaves_original_untouched() {
        let ctx = Context::background();
        let with = ctx.with_entry(Arc::new(NoLogger));

        assert!(ctx.entry().is_none());
        assert!(with.entry().is_some());
    }

    #[test]
    fn test_with_span_keeps_entry() {
        let ctx = Context::background().with_entry(Arc::new(NoLogger));
        let spanned = ctx.with_span(Span::none());
        assert!(spanned.entry().is_some());
    }
}
