use std::ops::RangeInclusive;

use scrolly_protocol::SubStepState;

use crate::config::{ConfigError, SequencerConfig};

/// One visual section and the logical indices it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntry {
    pub ordinal: usize,
    pub label: String,
    pub first: usize,
    pub last: usize,
    /// Offset of the section's top edge in `vh`.
    pub offset_vh: f64,
    pub sub_steps: Vec<String>,
}

impl StepEntry {
    pub fn range(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    pub fn is_pinned(&self) -> bool {
        !self.sub_steps.is_empty()
    }
}

/// Immutable table from logical index to visual section.
///
/// ```text
///   index   0    1    2    3    4    5    6    7    8   ...  12
///   entry  Hero Chal Prom Serv Appr [ Process ]  Res  ...  Contact
///   vh      0   100  200  300  400  500  500  500  600  ... 1000
/// ```
///
/// Ranges are contiguous, non-overlapping, and cover `0..total_steps`
/// exactly. Every lookup is a pure function of the index.
#[derive(Debug, Clone, PartialEq)]
pub struct StepMap {
    entries: Vec<StepEntry>,
    total_steps: usize,
    page_size_vh: f64,
    pinned: Option<usize>,
}

impl StepMap {
    pub fn from_config(config: &SequencerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut entries = Vec::with_capacity(config.sections.len());
        let mut pinned = None;
        let mut next = 0;
        for (ordinal, section) in config.sections.iter().enumerate() {
            let first = next;
            let last = first + section.span() - 1;
            if section.is_pinned() {
                pinned = Some(ordinal);
            }
            entries.push(StepEntry {
                ordinal,
                label: section.label.clone(),
                first,
                last,
                offset_vh: ordinal as f64 * config.page_size_vh,
                sub_steps: section.sub_steps.clone(),
            });
            next = last + 1;
        }

        Ok(Self {
            entries,
            total_steps: next,
            page_size_vh: config.page_size_vh,
            pinned,
        })
    }

    pub fn entries(&self) -> &[StepEntry] {
        &self.entries
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn last_index(&self) -> usize {
        self.total_steps - 1
    }

    pub fn page_size_vh(&self) -> f64 {
        self.page_size_vh
    }

    /// The pinned section, if the story has one.
    pub fn pinned_entry(&self) -> Option<&StepEntry> {
        self.pinned.map(|ordinal| &self.entries[ordinal])
    }

    pub fn pinned_range(&self) -> Option<RangeInclusive<usize>> {
        self.pinned_entry().map(StepEntry::range)
    }

    pub fn sub_step_labels(&self) -> &[String] {
        self.pinned_entry()
            .map(|e| e.sub_steps.as_slice())
            .unwrap_or_default()
    }

    /// Bound any integer to `0..=last_index`.
    pub fn clamp_index(&self, index: i64) -> usize {
        let last = self.last_index() as i64;
        index.clamp(0, last) as usize
    }

    /// Like [`clamp_index`](Self::clamp_index) for unsigned input.
    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    pub fn entry_for_index(&self, index: usize) -> &StepEntry {
        let index = self.clamp(index);
        let pos = self.entries.partition_point(|e| e.last < index);
        &self.entries[pos]
    }

    /// Story offset in `vh` for a logical index.
    ///
    /// Indices inside the pinned range all collapse onto the pinned
    /// section's offset. The index after the range sits one page below it,
    /// not on the pinned offset itself, so leaving the pinned section moves
    /// the story by a full page like every other step.
    pub fn offset_for_index(&self, index: usize) -> f64 {
        self.entry_for_index(index).offset_vh
    }

    /// 0 before the pinned range, then 1..=K. Indices past the range keep
    /// the last sub-step active.
    pub fn active_sub_step_for_index(&self, index: usize) -> usize {
        let Some(pinned) = self.pinned_entry() else {
            return 0;
        };
        let index = self.clamp(index);
        if index < pinned.first {
            0
        } else {
            (index - pinned.first + 1).min(pinned.sub_steps.len())
        }
    }

    /// States of every pinned sub-step, in order, for a logical index.
    pub fn sub_step_states(&self, index: usize) -> Vec<SubStepState> {
        let active = self.active_sub_step_for_index(index);
        (1..=self.sub_step_labels().len())
            .map(|step| sub_step_state(step, active))
            .collect()
    }

    /// First logical index of the section with the given ordinal.
    pub fn first_index_of(&self, ordinal: usize) -> Option<usize> {
        self.entries.get(ordinal).map(|e| e.first)
    }
}

/// `step` is 1-based. With `active == 0` nothing is past.
pub fn sub_step_state(step: usize, active: usize) -> SubStepState {
    if active == 0 {
        return SubStepState::Future;
    }
    match step.cmp(&active) {
        std::cmp::Ordering::Less => SubStepState::Past,
        std::cmp::Ordering::Equal => SubStepState::Active,
        std::cmp::Ordering::Greater => SubStepState::Future,
    }
}
