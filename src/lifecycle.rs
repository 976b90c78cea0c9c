//! Page lifecycle decisions

/// How the page is being left, from `pagehide`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// Going away for good
    Unload,
    /// Frozen in the back/forward cache; it may come back as is
    Cached,
}

impl PageExit {
    /// From `PageTransitionEvent.persisted`
    pub fn from_persisted(persisted: bool) -> Self {
        if persisted {
            PageExit::Cached
        } else {
            PageExit::Unload
        }
    }

    /// Whether listeners, timers and requests should be dropped. A cached page
    /// is restored without re-running the entry point, so it must keep them.
    pub fn releases_card(&self) -> bool {
        matches!(self, PageExit::Unload)
    }
}
