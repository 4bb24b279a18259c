use serde::{Deserialize, Serialize};

/// Relationship of one pinned sub-step to the current logical index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStepState {
    /// Already traversed.
    Past,
    /// The sub-step on screen.
    Active,
    /// Not reached yet.
    Future,
}

/// Snapshot of everything a renderer reads from the sequencer.
///
/// Every field except the flags is derived from `index`; a snapshot is
/// rebuilt on demand and never stored by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerView {
    pub index: usize,
    pub total_steps: usize,
    /// Vertical offset of the story in `vh`.
    pub offset_vh: f64,
    /// Ordinal of the visual section containing `index`.
    pub section: usize,
    pub section_label: String,
    /// 0 before the pinned range, otherwise 1..=K.
    pub active_sub_step: usize,
    /// One state per pinned sub-step, in order.
    pub sub_steps: Vec<SubStepState>,
    pub transitioning: bool,
    pub modal_open: bool,
}
