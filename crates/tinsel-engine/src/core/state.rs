use std::fmt::Debug;

/// Current game state plus a transition requested for the next frame.
///
/// Transitions never happen re-entrantly: `set` only records the request and
/// the frame driver applies it at the start of the following tick.
#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    current: S,
    pending: Option<S>,
    paused: bool,
}

impl<S: Copy + PartialEq + Debug> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            pending: None,
            paused: false,
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn pending(&self) -> Option<S> {
        self.pending
    }

    /// Request a transition. A later request in the same frame wins.
    pub fn set(&mut self, next: S) {
        self.pending = Some(next);
    }

    /// Apply the pending transition. Returns `(from, to)` when the state changed.
    pub fn apply_pending(&mut self) -> Option<(S, S)> {
        let next = self.pending.take()?;
        if next == self.current {
            return None;
        }
        let from = std::mem::replace(&mut self.current, next);
        log::debug!("state {:?} -> {:?}", from, next);
        Some((from, next))
    }

    /// Stop running the game's per-frame update. Everything else keeps ticking.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Phase {
        Play,
        End,
    }

    #[test]
    fn transition_waits_for_apply() {
        let mut sm = StateMachine::new(Phase::Play);
        sm.set(Phase::End);
        assert_eq!(sm.current(), Phase::Play);
        assert_eq!(sm.apply_pending(), Some((Phase::Play, Phase::End)));
        assert_eq!(sm.current(), Phase::End);
        assert_eq!(sm.apply_pending(), None);
    }

    #[test]
    fn same_state_is_not_a_transition() {
        let mut sm = StateMachine::new(Phase::Play);
        sm.set(Phase::Play);
        assert_eq!(sm.apply_pending(), None);
        assert_eq!(sm.pending(), None);
    }

    #[test]
    fn pause_flag() {
        let mut sm = StateMachine::new(Phase::Play);
        sm.pause();
        assert!(sm.is_paused());
        sm.resume();
        assert!(!sm.is_paused());
    }
}
