pub mod commands;
pub mod input;
pub mod theme;
pub mod types;
pub mod view;

pub use commands::{RenderCommand, TextAlign};
pub use input::{DeviceProfile, HostEvent, IntersectionEntry, Listener, NavKey};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
pub use view::{SequencerView, SubStepState};
