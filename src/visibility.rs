//! Combines page foreground state and on-screen intersection into play/pause.
//!
//! A surface animates only while the document is in the foreground AND the
//! surface intersects the viewport. Either source reporting "not visible"
//! pauses it. The gate remembers the last report from each source and
//! recomputes the directive on every change.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityGate {
    document_visible: bool,
    intersecting: bool,
}

impl Default for VisibilityGate {
    /// Both sources start out visible until told otherwise.
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl VisibilityGate {
    #[must_use]
    pub const fn new(document_visible: bool, intersecting: bool) -> Self {
        Self {
            document_visible,
            intersecting,
        }
    }

    pub fn set_document_visible(&mut self, visible: bool) -> Directive {
        self.document_visible = visible;
        self.directive()
    }

    pub fn set_intersecting(&mut self, intersecting: bool) -> Directive {
        self.intersecting = intersecting;
        self.directive()
    }

    #[must_use]
    pub fn directive(&self) -> Directive {
        if self.is_visible() {
            Directive::Play
        } else {
            Directive::Pause
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.document_visible && self.intersecting
    }

    #[must_use]
    pub fn document_visible(&self) -> bool {
        self.document_visible
    }

    #[must_use]
    pub fn intersecting(&self) -> bool {
        self.intersecting
    }
}

/// Whether an intersection ratio counts as on-screen for `threshold`.
///
/// A zero ratio never counts, even with a zero threshold.
#[must_use]
pub fn meets_threshold(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}
