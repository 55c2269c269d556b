//! Dispatcher lifecycle
//!
//! `Idle -> Resolving -> Spawning -> Running -> Exited(exit)`, with
//! `Failed(reason)` reachable from `Resolving` and `Spawning` only. Every run
//! starts from a fresh `Idle`; terminal states have no outgoing transitions.

use std::fmt;

use crate::domain::{ChildExit, DomainError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Resolving,
    Spawning,
    Running,
    Exited(ChildExit),
    Failed(String),
}

impl DispatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DispatchState::Exited(_) | DispatchState::Failed(_))
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: &DispatchState) -> bool {
        use DispatchState::*;
        matches!(
            (self, next),
            (Idle, Resolving)
                | (Resolving, Spawning)
                | (Resolving, Failed(_))
                | (Spawning, Running)
                | (Spawning, Failed(_))
                | (Running, Exited(_))
        )
    }

    /// Move to `next`, rejecting illegal transitions.
    pub fn advance(&mut self, next: DispatchState) -> Result<(), DomainError> {
        if !self.can_transition_to(&next) {
            return Err(DomainError::IllegalTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Idle => write!(f, "idle"),
            DispatchState::Resolving => write!(f, "resolving"),
            DispatchState::Spawning => write!(f, "spawning"),
            DispatchState::Running => write!(f, "running"),
            DispatchState::Exited(exit) => write!(f, "exited({})", exit),
            DispatchState::Failed(reason) => write!(f, "failed({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_happy_path_when_advancing_then_reaches_exited() {
        let mut state = DispatchState::Idle;
        state.advance(DispatchState::Resolving).unwrap();
        state.advance(DispatchState::Spawning).unwrap();
        state.advance(DispatchState::Running).unwrap();
        state
            .advance(DispatchState::Exited(ChildExit::Code(3)))
            .unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn given_running_when_failing_then_rejected() {
        let mut state = DispatchState::Running;
        let result = state.advance(DispatchState::Failed("late".into()));
        assert!(matches!(result, Err(DomainError::IllegalTransition { .. })));
        assert_eq!(state, DispatchState::Running);
    }

    #[test]
    fn given_terminal_state_when_advancing_then_rejected() {
        let mut state = DispatchState::Exited(ChildExit::Code(0));
        assert!(state.advance(DispatchState::Idle).is_err());
        assert!(state.advance(DispatchState::Resolving).is_err());
    }

    #[test]
    fn given_idle_when_skipping_resolution_then_rejected() {
        let state = DispatchState::Idle;
        assert!(!state.can_transition_to(&DispatchState::Spawning));
        assert!(!state.can_transition_to(&DispatchState::Failed("x".into())));
    }
}
