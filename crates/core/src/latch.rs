use crate::store::ScrollStore;

/// Host timestamp in milliseconds. Any monotonic origin works.
pub type Millis = u64;

/// Cooldown after an accepted gesture.
///
/// Holds a deadline rather than a timer handle: "still cooling down" is a
/// comparison against the caller's clock. Arming again replaces the
/// deadline, so the latest gesture's window always wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latch {
    until: Option<Millis>,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.until
    }

    pub fn is_cooling(&self, now: Millis) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Start a new window and raise the store's transition flag.
    pub fn arm(&mut self, store: &mut ScrollStore, now: Millis, duration_ms: u64) {
        self.until = Some(now.saturating_add(duration_ms));
        store.set_transitioning(true);
    }

    /// Drop the transition flag once the window has passed. Returns true if
    /// the flag was lowered by this call.
    pub fn release_if_elapsed(&mut self, store: &mut ScrollStore, now: Millis) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                store.set_transitioning(false)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequencerConfig;
    use crate::step_map::StepMap;

    fn store() -> ScrollStore {
        ScrollStore::new(&StepMap::from_config(&SequencerConfig::default()).unwrap())
    }

    #[test]
    fn window_is_half_open() {
        let mut s = store();
        let mut latch = Latch::new();
        latch.arm(&mut s, 1_000, 800);
        assert!(s.is_transitioning());
        assert!(latch.is_cooling(1_000));
        assert!(latch.is_cooling(1_799));
        assert!(!latch.is_cooling(1_800));

        assert!(!latch.release_if_elapsed(&mut s, 1_799));
        assert!(s.is_transitioning());
        assert!(latch.release_if_elapsed(&mut s, 1_800));
        assert!(!s.is_transitioning());
        assert_eq!(latch.deadline(), None);
    }

    #[test]
    fn rearming_replaces_deadline() {
        let mut s = store();
        let mut latch = Latch::new();
        latch.arm(&mut s, 0, 800);
        latch.arm(&mut s, 500, 800);
        assert_eq!(latch.deadline(), Some(1_300));
        assert!(!latch.release_if_elapsed(&mut s, 900));
        assert!(s.is_transitioning());
    }

    #[test]
    fn unarmed_latch_is_idle() {
        let mut s = store();
        let mut latch = Latch::new();
        assert!(!latch.is_cooling(0));
        assert!(!latch.release_if_elapsed(&mut s, 10));
    }
}
