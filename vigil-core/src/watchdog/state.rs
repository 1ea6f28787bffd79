//! Connectivity state tracking
//!
//! Keeps the one bit of state the loop needs besides its process handles:
//! the previous tick's connectivity, used to detect transition edges.

/// Connectivity as observed on a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// The client confirmed the tunnel is up
    Up,

    /// Anything else, including a failed or unparseable status query
    Down,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Up => write!(f, "up"),
            LinkState::Down => write!(f, "down"),
        }
    }
}

/// Edge-triggered transition detector
///
/// Seeded with Down regardless of the actual link state, so the first
/// observed Up produces a single up-edge and a watchdog started while
/// disconnected logs nothing spurious.
#[derive(Debug)]
pub struct EdgeDetector {
    up: bool,
}

impl EdgeDetector {
    /// Create a detector seeded with the Down state
    pub fn new() -> Self {
        Self { up: false }
    }

    /// Record this tick's observation
    ///
    /// Returns the new state exactly once per actual transition, None while
    /// the state is unchanged.
    pub fn observe(&mut self, state: LinkState) -> Option<LinkState> {
        let up = matches!(state, LinkState::Up);
        if up == self.up {
            return None;
        }
        self.up = up;
        Some(state)
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_down_suppresses_first_down() {
        let mut edges = EdgeDetector::new();
        assert_eq!(edges.observe(LinkState::Down), None);
        assert_eq!(edges.observe(LinkState::Down), None);
    }

    #[test]
    fn test_first_up_is_an_edge() {
        let mut edges = EdgeDetector::new();
        assert_eq!(edges.observe(LinkState::Up), Some(LinkState::Up));
        assert_eq!(edges.observe(LinkState::Up), None);
    }

    #[test]
    fn test_one_edge_per_transition() {
        let mut edges = EdgeDetector::new();

        // up, up, down logs exactly one down-edge
        assert_eq!(edges.observe(LinkState::Up), Some(LinkState::Up));
        assert_eq!(edges.observe(LinkState::Up), None);
        assert_eq!(edges.observe(LinkState::Down), Some(LinkState::Down));
        assert_eq!(edges.observe(LinkState::Down), None);
        assert_eq!(edges.observe(LinkState::Up), Some(LinkState::Up));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", LinkState::Up), "up");
        assert_eq!(format!("{}", LinkState::Down), "down");
    }
}
