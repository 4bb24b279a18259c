use crate::step_map::StepMap;

/// Single source of truth for "where am I in the story".
///
/// The index is always within `0..total_steps`. Setters clamp instead of
/// failing and report whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollStore {
    index: usize,
    last_index: usize,
    transitioning: bool,
    modal_open: bool,
}

impl ScrollStore {
    pub fn new(map: &StepMap) -> Self {
        Self {
            index: 0,
            last_index: map.last_index(),
            transitioning: false,
            modal_open: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == self.last_index
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn set_index(&mut self, index: i64) -> bool {
        let clamped = index.clamp(0, self.last_index as i64) as usize;
        let changed = clamped != self.index;
        self.index = clamped;
        changed
    }

    /// Advance one step. No-op on the last index.
    pub fn next(&mut self) -> bool {
        self.set_index(self.index as i64 + 1)
    }

    /// Go back one step. No-op on index 0.
    pub fn prev(&mut self) -> bool {
        self.set_index(self.index as i64 - 1)
    }

    pub fn set_transitioning(&mut self, transitioning: bool) -> bool {
        let changed = self.transitioning != transitioning;
        self.transitioning = transitioning;
        changed
    }

    pub fn set_modal_open(&mut self, open: bool) -> bool {
        let changed = self.modal_open != open;
        self.modal_open = open;
        changed
    }
}
