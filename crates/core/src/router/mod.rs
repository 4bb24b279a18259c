//! Input routing strategies.
//!
//! The device class is decided once at mount and picks exactly one router.
//! The desktop router pages through the story on wheel and keyboard input;
//! the intersection tracker follows native scrolling on mobile. Neither
//! re-checks the device class per event: a router that never attached a
//! listener simply reports [`IgnoreReason::NotAttached`] for its events.

pub mod desktop;
pub mod tracker;

pub use desktop::DesktopRouter;
pub use tracker::{IntersectionTracker, parse_section_id, section_element_id};

use scrolly_protocol::{DeviceProfile, HostEvent, Listener};
use serde::Serialize;

use crate::config::SequencerConfig;
use crate::device::DeviceClass;
use crate::latch::{Latch, Millis};
use crate::step_map::StepMap;
use crate::store::ScrollStore;

/// Everything a router may read or mutate while handling one event.
pub struct RouteContext<'a> {
    pub map: &'a StepMap,
    pub store: &'a mut ScrollStore,
    pub latch: &'a mut Latch,
    pub now: Millis,
}

/// Outcome of dispatching one host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Disposition {
    Accepted { from: usize, to: usize },
    Ignored { reason: IgnoreReason },
}

impl Disposition {
    pub(crate) fn ignored(reason: IgnoreReason) -> Self {
        Self::Ignored { reason }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Whether an accepted desktop gesture must suppress native scrolling.
    ///
    /// This is the floor every router honors. The desktop router also
    /// suppresses dropped gestures while it holds the scroll lock; see
    /// [`InputRouter::prevents_native_scroll`].
    pub fn prevents_native_scroll(&self, class: DeviceClass) -> bool {
        class == DeviceClass::Desktop && self.is_accepted()
    }
}

/// Why an event did not move the index. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The active router never attached a listener for this event.
    NotAttached,
    ModalOpen,
    CoolingDown,
    BelowThreshold,
    /// Already at the first/last index, or already at the jump target.
    AtBoundary,
    /// No section was visible enough.
    NoVisibleSection,
    /// The most visible section is the one last written.
    Unchanged,
}

pub trait InputRouter: std::fmt::Debug + Send {
    fn device_class(&self) -> DeviceClass;

    /// Listeners this router attached at mount. Fixed for its lifetime.
    fn listeners(&self) -> &'static [Listener];

    fn dispatch(&mut self, ctx: &mut RouteContext<'_>, event: &HostEvent) -> Disposition;

    /// Re-evaluate side effects after a resize. Never attaches listeners.
    fn on_resize(&mut self, _profile: &DeviceProfile) {}

    /// Whether the page's native scrolling is currently suppressed.
    fn native_scroll_locked(&self) -> bool {
        false
    }

    /// Whether the host should call `preventDefault()` on the event that
    /// produced `disposition`.
    fn prevents_native_scroll(&self, disposition: &Disposition) -> bool {
        disposition.prevents_native_scroll(self.device_class())
    }

    fn attached(&self, listener: Listener) -> bool {
        self.listeners().contains(&listener)
    }
}

/// Build the router for a device class.
pub fn select(class: DeviceClass, config: &SequencerConfig, index: usize) -> Box<dyn InputRouter> {
    match class {
        DeviceClass::Desktop => Box::new(DesktopRouter::new(config)),
        DeviceClass::Mobile => Box::new(IntersectionTracker::new(config, index)),
    }
}
