use serde::{Deserialize, Serialize};

/// What the host knows about the device when the sequencer mounts or the
/// window resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Layout viewport width in CSS pixels.
    pub viewport_width: f64,
    /// `(pointer: coarse)` matched.
    pub coarse_pointer: bool,
    /// `(hover: hover)` matched.
    pub can_hover: bool,
}

impl DeviceProfile {
    /// A wide viewport with a mouse.
    pub fn desktop(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            coarse_pointer: false,
            can_hover: true,
        }
    }

    /// A touch device without hover.
    pub fn touch(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            coarse_pointer: true,
            can_hover: false,
        }
    }
}

/// Navigation keys understood by the desktop router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavKey {
    ArrowDown,
    PageDown,
    ArrowUp,
    PageUp,
    Home,
    End,
}

impl NavKey {
    /// Parse a DOM `KeyboardEvent.key` value. Other keys are not ours.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "Down" => Some(Self::ArrowDown),
            "PageDown" => Some(Self::PageDown),
            "ArrowUp" | "Up" => Some(Self::ArrowUp),
            "PageUp" => Some(Self::PageUp),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }
}

/// One entry of an `IntersectionObserver` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    /// The observed element's id, e.g. `section-4`.
    pub element_id: String,
    /// `intersectionRatio`, 0.0..=1.0.
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(element_id: impl Into<String>, ratio: f64) -> Self {
        Self {
            element_id: element_id.into(),
            ratio,
        }
    }
}

/// An event forwarded from the host to the sequencer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Wheel { delta_y: f64 },
    Key { key: NavKey },
    Intersections { entries: Vec<IntersectionEntry> },
}

impl HostEvent {
    /// The listener a host must have attached to produce this event.
    pub fn listener(&self) -> Listener {
        match self {
            Self::Wheel { .. } => Listener::Wheel,
            Self::Key { .. } => Listener::Keyboard,
            Self::Intersections { .. } => Listener::Intersection,
        }
    }
}

/// Host-side listener kinds. A router declares the set it attaches at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Listener {
    Wheel,
    Keyboard,
    Intersection,
}
