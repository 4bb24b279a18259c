use scrolly_protocol::{HostEvent, IntersectionEntry, Listener};
use tracing::{debug, trace};

use super::{Disposition, IgnoreReason, InputRouter, RouteContext};
use crate::config::SequencerConfig;
use crate::device::DeviceClass;

const LISTENERS: &[Listener] = &[Listener::Intersection];
const SECTION_ID_PREFIX: &str = "section-";

/// DOM id of the element that renders a logical index.
pub fn section_element_id(index: usize) -> String {
    format!("{SECTION_ID_PREFIX}{index}")
}

/// Recover the logical index from a section element id.
///
/// Returns the raw number so callers can clamp it; ids that do not carry a
/// number are `None`.
pub fn parse_section_id(id: &str) -> Option<i64> {
    id.strip_prefix(SECTION_ID_PREFIX)?.trim().parse().ok()
}

/// Follows native scrolling on mobile: the most visible section becomes
/// the current index.
#[derive(Debug, Clone)]
pub struct IntersectionTracker {
    min_ratio: f64,
    last_written: Option<usize>,
}

impl IntersectionTracker {
    pub fn new(config: &SequencerConfig, index: usize) -> Self {
        Self {
            min_ratio: config.min_visibility_ratio,
            last_written: Some(index),
        }
    }

    pub fn last_written(&self) -> Option<usize> {
        self.last_written
    }

    fn route(
        &mut self,
        ctx: &mut RouteContext<'_>,
        entries: &[IntersectionEntry],
    ) -> Result<(usize, usize), IgnoreReason> {
        let raw = most_visible(entries, self.min_ratio).ok_or(IgnoreReason::NoVisibleSection)?;
        let index = ctx.map.clamp_index(raw);
        // Compare against the store, not `last_written`: a programmatic jump
        // may have moved the index since this tracker last wrote it.
        if ctx.store.index() == index {
            self.last_written = Some(index);
            return Err(IgnoreReason::Unchanged);
        }
        let from = ctx.store.index();
        ctx.store.set_index(index as i64);
        self.last_written = Some(index);
        Ok((from, index))
    }
}

/// Pick the entry with the strictly highest ratio above `min_ratio`.
/// Ties keep the first entry seen; ids without an index are skipped.
fn most_visible(entries: &[IntersectionEntry], min_ratio: f64) -> Option<i64> {
    let mut best: Option<(i64, f64)> = None;
    for entry in entries {
        if entry.ratio.is_nan() || entry.ratio <= min_ratio {
            continue;
        }
        let Some(index) = parse_section_id(&entry.element_id) else {
            continue;
        };
        if best.is_none_or(|(_, ratio)| entry.ratio > ratio) {
            best = Some((index, entry.ratio));
        }
    }
    best.map(|(index, _)| index)
}

impl InputRouter for IntersectionTracker {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Mobile
    }

    fn listeners(&self) -> &'static [Listener] {
        LISTENERS
    }

    fn dispatch(&mut self, ctx: &mut RouteContext<'_>, event: &HostEvent) -> Disposition {
        let HostEvent::Intersections { entries } = event else {
            return Disposition::ignored(IgnoreReason::NotAttached);
        };
        match self.route(ctx, entries) {
            Ok((from, to)) => {
                debug!(from, to, "visible section changed");
                Disposition::Accepted { from, to }
            }
            Err(reason) => {
                trace!(?reason, batch = entries.len(), "intersection batch skipped");
                Disposition::ignored(reason)
            }
        }
    }
}
