//! Activation lifecycle
//!
//! An elemation activates at most once:
//!
//! ```text
//! Dormant --Arm--> Armed --Fire--> Fired
//!    \____________Fire___________/
//! ```
//!
//! `Fired` is terminal. Any other (state, event) pair yields no transition.

/// Lifecycle state of an elemation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivationState {
    /// Constructed, `ready()` not yet called
    #[default]
    Dormant,
    /// Scroll listener attached, waiting for the trigger window
    Armed,
    /// Class-append tasks scheduled
    Fired,
}

/// Events driving [`ActivationState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationEvent {
    /// Activation ran while the trigger was out of view
    Arm,
    /// The trigger window reached the viewport midpoint
    Fire,
}

impl ActivationState {
    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: ActivationEvent) -> Option<Self> {
        use ActivationEvent::*;

        match (self, event) {
            (ActivationState::Dormant, Arm) => Some(ActivationState::Armed),
            (ActivationState::Dormant, Fire) => Some(ActivationState::Fired),
            (ActivationState::Armed, Fire) => Some(ActivationState::Fired),
            _ => None,
        }
    }

    /// Returns true once activation has run
    pub fn is_ready(&self) -> bool {
        !matches!(self, ActivationState::Dormant)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, ActivationState::Armed)
    }

    pub fn is_fired(&self) -> bool {
        matches!(self, ActivationState::Fired)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationState::Dormant => "dormant",
            ActivationState::Armed => "armed",
            ActivationState::Fired => "fired",
        }
    }
}

impl std::fmt::Display for ActivationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
