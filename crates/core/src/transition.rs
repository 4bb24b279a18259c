use crate::latch::Millis;

/// Animation of the story offset toward the current index's offset.
///
/// Retargeting starts from wherever the previous animation currently is,
/// so an interrupted transition never jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from_vh: f64,
    to_vh: f64,
    start: Millis,
    duration_ms: u64,
}

impl Transition {
    /// A finished transition resting at `offset_vh`.
    pub fn at_rest(offset_vh: f64) -> Self {
        Self {
            from_vh: offset_vh,
            to_vh: offset_vh,
            start: 0,
            duration_ms: 1,
        }
    }

    pub fn target(&self) -> f64 {
        self.to_vh
    }

    pub fn is_done(&self, now: Millis) -> bool {
        now.saturating_sub(self.start) >= self.duration_ms
    }

    /// Offset in `vh` at `now`.
    pub fn sample(&self, now: Millis) -> f64 {
        let elapsed = now.saturating_sub(self.start);
        let t = (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
        self.from_vh + (self.to_vh - self.from_vh) * ease_in_out_cubic(t)
    }

    /// Head for `to_vh`, starting from the current sample.
    pub fn retarget(&mut self, now: Millis, to_vh: f64, duration_ms: u64) {
        if (to_vh - self.to_vh).abs() < f64::EPSILON {
            return;
        }
        *self = Self {
            from_vh: self.sample(now),
            to_vh,
            start: now,
            duration_ms: duration_ms.max(1),
        };
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_is_done() {
        let tr = Transition::at_rest(300.0);
        assert!(tr.is_done(1));
        assert!((tr.sample(0) - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reaches_target_at_duration() {
        let mut tr = Transition::at_rest(0.0);
        tr.retarget(1_000, 100.0, 700);
        assert!((tr.sample(1_000) - 0.0).abs() < 1e-9);
        assert!((tr.sample(1_350) - 50.0).abs() < 1e-9);
        assert!((tr.sample(1_700) - 100.0).abs() < 1e-9);
        assert!(tr.is_done(1_700));
        assert!(!tr.is_done(1_699));
    }

    #[test]
    fn samples_are_monotonic_toward_target() {
        let mut tr = Transition::at_rest(500.0);
        tr.retarget(0, 600.0, 700);
        let mut prev = tr.sample(0);
        for now in (0..=700).step_by(16) {
            let v = tr.sample(now);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut tr = Transition::at_rest(0.0);
        tr.retarget(0, 100.0, 700);
        tr.retarget(350, 100.0, 700);
        assert!(tr.is_done(700));
    }

    #[test]
    fn interrupted_transition_starts_from_sample() {
        let mut tr = Transition::at_rest(0.0);
        tr.retarget(0, 100.0, 700);
        let mid = tr.sample(350);
        tr.retarget(350, 0.0, 700);
        assert!((tr.sample(350) - mid).abs() < 1e-9);
        assert!((tr.target() - 0.0).abs() < f64::EPSILON);
    }
}
