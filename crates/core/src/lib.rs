//! Logical scroll sequencer for a scrollytelling page.
//!
//! ```text
//!   host events ──▶ InputRouter ──▶ ScrollStore ──▶ StepMap lookups ──▶ views
//!   (wheel, key,     (desktop or      (index,         (offset, sub-step    (RenderCommand[])
//!    intersections)   mobile, fixed    flags)          state)
//!                     at mount)
//! ```
//!
//! Everything a renderer shows is a pure function of the logical index.
//! The only time-dependent state is the cooldown latch, which compares a
//! deadline against timestamps supplied by the host.

pub mod config;
pub mod device;
pub mod latch;
pub mod router;
pub mod sequencer;
pub mod step_map;
pub mod store;
pub mod transition;
pub mod views;

pub use config::{ConfigError, SectionConfig, SequencerConfig};
pub use device::DeviceClass;
pub use latch::{Latch, Millis};
pub use router::{Disposition, IgnoreReason, InputRouter};
pub use sequencer::Sequencer;
pub use step_map::{StepEntry, StepMap, sub_step_state};
pub use store::ScrollStore;
pub use transition::Transition;
