use scrolly_protocol::{DeviceProfile, HostEvent, Listener, SequencerView};
use tracing::{debug, info};

use crate::config::{ConfigError, SequencerConfig};
use crate::device::DeviceClass;
use crate::latch::{Latch, Millis};
use crate::router::{self, Disposition, InputRouter, RouteContext};
use crate::step_map::StepMap;
use crate::store::ScrollStore;
use crate::transition::Transition;

/// The mounted scroll sequencer.
///
/// Created once when the page starts and kept for its lifetime. Owns the
/// step map, the store, the cooldown latch, and the input router chosen
/// for the device at mount.
#[derive(Debug)]
pub struct Sequencer {
    config: SequencerConfig,
    map: StepMap,
    store: ScrollStore,
    latch: Latch,
    router: Box<dyn InputRouter>,
    transition: Transition,
}

impl Sequencer {
    pub fn mount(config: SequencerConfig, device: &DeviceProfile) -> Result<Self, ConfigError> {
        let map = StepMap::from_config(&config)?;
        let store = ScrollStore::new(&map);
        let class = DeviceClass::classify(device, config.mobile_breakpoint_px);
        let router = router::select(class, &config, store.index());
        info!(
            ?class,
            total_steps = map.total_steps(),
            pinned = ?map.pinned_range(),
            listeners = ?router.listeners(),
            "sequencer mounted"
        );
        Ok(Self {
            transition: Transition::at_rest(map.offset_for_index(store.index())),
            config,
            map,
            store,
            latch: Latch::new(),
            router,
        })
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn step_map(&self) -> &StepMap {
        &self.map
    }

    pub fn store(&self) -> &ScrollStore {
        &self.store
    }

    pub fn index(&self) -> usize {
        self.store.index()
    }

    pub fn device_class(&self) -> DeviceClass {
        self.router.device_class()
    }

    pub fn listeners(&self) -> &'static [Listener] {
        self.router.listeners()
    }

    pub fn native_scroll_locked(&self) -> bool {
        self.router.native_scroll_locked()
    }

    /// Whether the host should call `preventDefault()` on the event that
    /// produced `disposition`.
    pub fn prevents_native_scroll(&self, disposition: &Disposition) -> bool {
        self.router.prevents_native_scroll(disposition)
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Route one host event through the mounted router.
    pub fn handle(&mut self, event: &HostEvent, now: Millis) -> Disposition {
        let mut ctx = RouteContext {
            map: &self.map,
            store: &mut self.store,
            latch: &mut self.latch,
            now,
        };
        let disposition = self.router.dispatch(&mut ctx, event);
        if disposition.is_accepted() {
            self.follow_index(now);
        }
        disposition
    }

    /// Advance time without input. Returns true when the transition flag
    /// was released.
    pub fn tick(&mut self, now: Millis) -> bool {
        self.latch.release_if_elapsed(&mut self.store, now)
    }

    /// Programmatic jump. Not subject to the latch, but re-arms it.
    pub fn go_to(&mut self, index: i64, now: Millis) -> bool {
        let from = self.store.index();
        if !self.store.set_index(index) {
            return false;
        }
        self.latch.arm(&mut self.store, now, self.config.cooldown_ms);
        debug!(from, to = self.store.index(), "programmatic jump");
        self.follow_index(now);
        true
    }

    /// Jump to the first logical index of a section.
    pub fn go_to_section(&mut self, ordinal: usize, now: Millis) -> bool {
        match self.map.first_index_of(ordinal) {
            Some(first) => self.go_to(first as i64, now),
            None => false,
        }
    }

    pub fn next(&mut self, now: Millis) -> bool {
        self.go_to(self.store.index() as i64 + 1, now)
    }

    pub fn prev(&mut self, now: Millis) -> bool {
        self.go_to(self.store.index() as i64 - 1, now)
    }

    /// Called by the lead-capture overlay on open and close.
    pub fn set_modal_open(&mut self, open: bool) -> bool {
        let changed = self.store.set_modal_open(open);
        if changed {
            debug!(open, "modal state changed");
        }
        changed
    }

    /// Window resized. The router keeps its listeners and only updates
    /// side effects such as the native scroll lock.
    pub fn resize(&mut self, device: &DeviceProfile) {
        self.router.on_resize(device);
    }

    /// Story offset in `vh` at `now`, following the transition curve.
    pub fn animated_offset(&self, now: Millis) -> f64 {
        self.transition.sample(now)
    }

    pub fn view(&self) -> SequencerView {
        let index = self.store.index();
        let entry = self.map.entry_for_index(index);
        SequencerView {
            index,
            total_steps: self.map.total_steps(),
            offset_vh: self.map.offset_for_index(index),
            section: entry.ordinal,
            section_label: entry.label.clone(),
            active_sub_step: self.map.active_sub_step_for_index(index),
            sub_steps: self.map.sub_step_states(index),
            transitioning: self.store.is_transitioning(),
            modal_open: self.store.is_modal_open(),
        }
    }

    fn follow_index(&mut self, now: Millis) {
        let target = self.map.offset_for_index(self.store.index());
        self.transition.retarget(now, target, self.config.transition_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::IgnoreReason;
    use scrolly_protocol::{IntersectionEntry, NavKey, SubStepState};

    fn desktop() -> Sequencer {
        Sequencer::mount(SequencerConfig::default(), &DeviceProfile::desktop(1440.0)).unwrap()
    }

    fn mobile() -> Sequencer {
        Sequencer::mount(SequencerConfig::default(), &DeviceProfile::touch(390.0)).unwrap()
    }

    #[test]
    fn mount_selects_router_once() {
        let d = desktop();
        assert_eq!(d.device_class(), DeviceClass::Desktop);
        assert_eq!(d.listeners(), &[Listener::Wheel, Listener::Keyboard]);
        assert!(d.native_scroll_locked());

        let m = mobile();
        assert_eq!(m.device_class(), DeviceClass::Mobile);
        assert_eq!(m.listeners(), &[Listener::Intersection]);
        assert!(!m.native_scroll_locked());
    }

    #[test]
    fn mount_rejects_invalid_config() {
        let config = SequencerConfig {
            sections: vec![],
            ..SequencerConfig::default()
        };
        assert!(Sequencer::mount(config, &DeviceProfile::desktop(1440.0)).is_err());
    }

    #[test]
    fn resize_never_swaps_router() {
        let mut s = desktop();
        s.resize(&DeviceProfile::touch(390.0));
        assert_eq!(s.device_class(), DeviceClass::Desktop);
        assert!(!s.native_scroll_locked());
        assert!(s.handle(&HostEvent::Wheel { delta_y: 100.0 }, 0).is_accepted());
    }

    #[test]
    fn prevent_default_follows_mounted_router() {
        let mut d = desktop();
        d.handle(&HostEvent::Wheel { delta_y: 100.0 }, 0);
        let cooling = d.handle(&HostEvent::Wheel { delta_y: 100.0 }, 10);
        assert!(d.prevents_native_scroll(&cooling));

        let mut m = mobile();
        let wheel = m.handle(&HostEvent::Wheel { delta_y: 100.0 }, 0);
        assert!(!m.prevents_native_scroll(&wheel));
    }

    #[test]
    fn tick_releases_flag() {
        let mut s = desktop();
        s.handle(&HostEvent::Key { key: NavKey::PageDown }, 0);
        assert!(s.view().transitioning);
        assert!(!s.tick(799));
        assert!(s.tick(800));
        assert!(!s.view().transitioning);
    }

    #[test]
    fn programmatic_jump_ignores_and_rearms_latch() {
        let mut s = desktop();
        s.handle(&HostEvent::Wheel { delta_y: 100.0 }, 0);
        assert!(s.go_to(0, 100));
        assert_eq!(s.index(), 0);
        assert_eq!(
            s.handle(&HostEvent::Wheel { delta_y: 100.0 }, 850),
            Disposition::Ignored {
                reason: IgnoreReason::CoolingDown
            }
        );
        assert!(s.handle(&HostEvent::Wheel { delta_y: 100.0 }, 900).is_accepted());
    }

    #[test]
    fn go_to_clamps_and_reports_noop() {
        let mut s = desktop();
        assert!(s.go_to(500, 0));
        assert_eq!(s.index(), 12);
        assert!(!s.go_to(12, 5_000));
        assert!(s.go_to_section(5, 10_000));
        assert_eq!(s.index(), 5);
        assert!(!s.go_to_section(42, 20_000));
    }

    #[test]
    fn view_reflects_pinned_state() {
        let mut s = desktop();
        s.go_to(6, 0);
        let view = s.view();
        assert_eq!(view.section, 5);
        assert_eq!(view.section_label, "Process");
        assert_eq!(view.active_sub_step, 2);
        assert_eq!(
            view.sub_steps,
            vec![
                SubStepState::Past,
                SubStepState::Active,
                SubStepState::Future
            ]
        );
        assert!((view.offset_vh - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn modal_flag_guards_desktop_input() {
        let mut s = desktop();
        assert!(s.set_modal_open(true));
        assert!(!s.handle(&HostEvent::Key { key: NavKey::End }, 0).is_accepted());
        assert!(s.set_modal_open(false));
        assert!(s.handle(&HostEvent::Key { key: NavKey::End }, 0).is_accepted());
        assert_eq!(s.index(), 12);
    }

    #[test]
    fn mobile_follows_visibility() {
        let mut s = mobile();
        let batch = HostEvent::Intersections {
            entries: vec![
                IntersectionEntry::new("section-6", 0.7),
                IntersectionEntry::new("section-7", 0.2),
            ],
        };
        assert!(s.handle(&batch, 0).is_accepted());
        assert_eq!(s.view().active_sub_step, 2);
        assert!(!s.handle(&HostEvent::Wheel { delta_y: 400.0 }, 0).is_accepted());
    }

    #[test]
    fn tracker_follows_scroll_back_after_jump() {
        let mut s = mobile();
        assert!(s.go_to(8, 0));
        let at = |id: &str| HostEvent::Intersections {
            entries: vec![IntersectionEntry::new(id, 1.0)],
        };

        // Settling on the jump target writes nothing.
        assert_eq!(
            s.handle(&at("section-8"), 10),
            Disposition::Ignored {
                reason: IgnoreReason::Unchanged
            }
        );
        // Scrolling back to where the tracker last wrote moves the index.
        assert_eq!(
            s.handle(&at("section-0"), 20),
            Disposition::Accepted { from: 8, to: 0 }
        );
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn animated_offset_reaches_target() {
        let mut s = desktop();
        s.handle(&HostEvent::Wheel { delta_y: 100.0 }, 1_000);
        assert!(s.animated_offset(1_000).abs() < 1e-9);
        assert!((s.animated_offset(1_700) - 100.0).abs() < 1e-9);
    }
}
