//! Component lifecycle phases

/// Lifecycle phase of a component host
///
/// `Unattached -> Initializing -> Rendered <-> Rerendering -> Detached`.
/// `Detached` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Created but not yet part of a live tree
    #[default]
    Unattached,

    /// `init` is running; the first render has not happened yet
    Initializing,

    /// Markup reflects the last committed state
    Rendered,

    /// A `set_state` render cycle is in progress
    Rerendering,

    /// Removed from the tree
    Detached,
}

impl LifecyclePhase {
    /// Whether the component has rendered and is still attached
    pub fn is_live(self) -> bool {
        matches!(self, LifecyclePhase::Rendered | LifecyclePhase::Rerendering)
    }

    /// Whether a transition from `self` to `next` is allowed
    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::*;

        matches!(
            (self, next),
            (Unattached, Initializing)
                | (Initializing, Unattached)
                | (Initializing, Rendered)
                | (Rendered, Rerendering)
                | (Rerendering, Rendered)
                | (Rerendering, Rerendering)
                | (Rendered, Detached)
                | (Rerendering, Detached)
        )
    }
}
