//! Native scrolling for `--mobile`, where the terminal stands in for a
//! phone browser. The story scrolls line by line and every visible
//! logical index is reported the way an `IntersectionObserver` would.

use scrolly_core::StepMap;
use scrolly_core::router::section_element_id;
use scrolly_protocol::{IntersectionEntry, Viewport};

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeScroll {
    /// Scroll position in rows.
    top: f64,
}

impl NativeScroll {
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Story offset in `vh` for the current position.
    pub fn offset_vh(&self, viewport: &Viewport) -> f64 {
        if viewport.height <= 0.0 {
            return 0.0;
        }
        self.top * 100.0 / viewport.height
    }

    pub fn scroll_by(&mut self, rows: f64, map: &StepMap, viewport: &Viewport) {
        self.top = (self.top + rows).clamp(0.0, max_top(map, viewport));
    }

    /// Scroll so the element for `index` sits at the top of the viewport.
    pub fn scroll_to_index(&mut self, index: usize, map: &StepMap, viewport: &Viewport) {
        let entry = map.entry_for_index(index);
        let slice = Slices::of(map, viewport, entry.offset_vh, entry.range().count());
        let top = slice.top + (index - entry.first) as f64 * slice.height;
        self.top = top.clamp(0.0, max_top(map, viewport));
    }

    /// Visibility of each logical index's element. The pinned section's
    /// page is split into one slice per sub-step. Elements entirely out of
    /// view are not reported.
    pub fn intersections(&self, map: &StepMap, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let view_top = self.top;
        let view_bottom = self.top + viewport.height;
        let mut entries = Vec::new();
        for entry in map.entries() {
            let slices = Slices::of(map, viewport, entry.offset_vh, entry.range().count());
            if slices.height <= 0.0 {
                continue;
            }
            for (i, index) in entry.range().enumerate() {
                let top = slices.top + i as f64 * slices.height;
                let bottom = top + slices.height;
                let visible = bottom.min(view_bottom) - top.max(view_top);
                if visible > 0.0 {
                    entries.push(IntersectionEntry::new(
                        section_element_id(index),
                        visible / slices.height,
                    ));
                }
            }
        }
        entries
    }
}

/// Equal-height slices of one section's page.
struct Slices {
    top: f64,
    height: f64,
}

impl Slices {
    fn of(map: &StepMap, viewport: &Viewport, offset_vh: f64, count: usize) -> Self {
        Self {
            top: viewport.vh(offset_vh),
            height: viewport.vh(map.page_size_vh()) / count.max(1) as f64,
        }
    }
}

fn max_top(map: &StepMap, viewport: &Viewport) -> f64 {
    map.entries()
        .last()
        .map(|last| viewport.vh(last.offset_vh + map.page_size_vh()) - viewport.height)
        .unwrap_or(0.0)
        .max(0.0)
}
