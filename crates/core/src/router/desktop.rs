use scrolly_protocol::{DeviceProfile, HostEvent, Listener, NavKey};
use tracing::{debug, trace};

use super::{Disposition, IgnoreReason, InputRouter, RouteContext};
use crate::config::SequencerConfig;
use crate::device::DeviceClass;

const LISTENERS: &[Listener] = &[Listener::Wheel, Listener::Keyboard];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next,
    Prev,
    Jump(JumpTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpTarget {
    First,
    Last,
}

/// Pages through the story on wheel and keyboard gestures.
///
/// Each accepted gesture arms the latch; anything arriving before it
/// expires is dropped, not queued.
#[derive(Debug, Clone)]
pub struct DesktopRouter {
    cooldown_ms: u64,
    wheel_threshold: f64,
    breakpoint_px: f64,
    scroll_locked: bool,
}

impl DesktopRouter {
    pub fn new(config: &SequencerConfig) -> Self {
        Self {
            cooldown_ms: config.cooldown_ms,
            wheel_threshold: config.wheel_threshold,
            breakpoint_px: config.mobile_breakpoint_px,
            scroll_locked: true,
        }
    }

    fn step_for(&self, event: &HostEvent) -> Result<Step, IgnoreReason> {
        match event {
            HostEvent::Wheel { delta_y } => {
                // NaN compares false and falls through to the threshold arm.
                if *delta_y >= self.wheel_threshold && *delta_y > 0.0 {
                    Ok(Step::Next)
                } else if *delta_y <= -self.wheel_threshold && *delta_y < 0.0 {
                    Ok(Step::Prev)
                } else {
                    Err(IgnoreReason::BelowThreshold)
                }
            }
            HostEvent::Key { key } => Ok(match key {
                NavKey::ArrowDown | NavKey::PageDown => Step::Next,
                NavKey::ArrowUp | NavKey::PageUp => Step::Prev,
                NavKey::Home => Step::Jump(JumpTarget::First),
                NavKey::End => Step::Jump(JumpTarget::Last),
            }),
            HostEvent::Intersections { .. } => Err(IgnoreReason::NotAttached),
        }
    }

    fn route(
        &mut self,
        ctx: &mut RouteContext<'_>,
        event: &HostEvent,
    ) -> Result<(usize, usize), IgnoreReason> {
        if !self.attached(event.listener()) {
            return Err(IgnoreReason::NotAttached);
        }
        if ctx.store.is_modal_open() {
            return Err(IgnoreReason::ModalOpen);
        }
        ctx.latch.release_if_elapsed(ctx.store, ctx.now);
        if ctx.store.is_transitioning() {
            return Err(IgnoreReason::CoolingDown);
        }

        let step = self.step_for(event)?;
        let from = ctx.store.index();
        let changed = match step {
            Step::Next => ctx.store.next(),
            Step::Prev => ctx.store.prev(),
            Step::Jump(JumpTarget::First) => ctx.store.set_index(0),
            Step::Jump(JumpTarget::Last) => ctx.store.set_index(ctx.map.last_index() as i64),
        };
        if !changed {
            return Err(IgnoreReason::AtBoundary);
        }

        ctx.latch.arm(ctx.store, ctx.now, self.cooldown_ms);
        Ok((from, ctx.store.index()))
    }
}

impl InputRouter for DesktopRouter {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Desktop
    }

    fn listeners(&self) -> &'static [Listener] {
        LISTENERS
    }

    fn dispatch(&mut self, ctx: &mut RouteContext<'_>, event: &HostEvent) -> Disposition {
        match self.route(ctx, event) {
            Ok((from, to)) => {
                debug!(from, to, now = ctx.now, "desktop step accepted");
                Disposition::Accepted { from, to }
            }
            Err(reason) => {
                trace!(?reason, ?event, "desktop gesture dropped");
                Disposition::ignored(reason)
            }
        }
    }

    fn on_resize(&mut self, profile: &DeviceProfile) {
        let locked = DeviceClass::classify(profile, self.breakpoint_px) == DeviceClass::Desktop;
        if locked != self.scroll_locked {
            debug!(locked, width = profile.viewport_width, "native scroll lock changed");
            self.scroll_locked = locked;
        }
    }

    fn native_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// While locked the page is paged, so gestures dropped by the latch,
    /// the noise threshold or a boundary are swallowed too. Gestures under
    /// an open modal always pass through to the overlay.
    fn prevents_native_scroll(&self, disposition: &Disposition) -> bool {
        match disposition {
            Disposition::Accepted { .. } => true,
            Disposition::Ignored { reason } => {
                self.scroll_locked
                    && matches!(
                        reason,
                        IgnoreReason::CoolingDown
                            | IgnoreReason::BelowThreshold
                            | IgnoreReason::AtBoundary
                    )
            }
        }
    }
}
