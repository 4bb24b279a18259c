use scrolly_protocol::{Rect, RenderCommand, SequencerView, ThemeToken, Viewport};

use crate::step_map::StepMap;

/// Render the section navigation dots along the right edge.
///
/// One dot per section, vertically centered. Each dot targets the first
/// logical index of its section, so clicking the pinned section's dot
/// restarts its sub-steps.
pub fn render_nav(map: &StepMap, view: &SequencerView, viewport: &Viewport) -> Vec<RenderCommand> {
    let entries = map.entries();
    if entries.is_empty() || viewport.height <= 0.0 {
        return Vec::new();
    }

    let dot = (viewport.height / 40.0).floor().max(1.0);
    let gap = dot;
    let column_h = entries.len() as f64 * (dot + gap) - gap;
    let x = viewport.width - dot * 2.0;
    let mut y = ((viewport.height - column_h) / 2.0).floor().max(0.0);

    let mut commands = Vec::with_capacity(entries.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "nav".into(),
        label: Some("Sections".into()),
    });
    for entry in entries {
        let active = entry.ordinal == view.section;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, y, dot, dot),
            color: if active {
                ThemeToken::NavDotActive
            } else {
                ThemeToken::NavDot
            },
            border_color: None,
            label: Some(entry.label.clone()),
            target: Some(entry.first),
        });
        y += dot + gap;
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequencerConfig;
    use crate::sequencer::Sequencer;
    use crate::views::hit_test;
    use scrolly_protocol::{DeviceProfile, Point};

    #[test]
    fn one_dot_per_section_with_active_marked() {
        let mut s =
            Sequencer::mount(SequencerConfig::default(), &DeviceProfile::desktop(1280.0)).unwrap();
        s.go_to(7, 0);
        let cmds = render_nav(s.step_map(), &s.view(), &Viewport::new(120.0, 40.0));
        let dots: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { color, target, .. } => Some((*color, *target)),
                _ => None,
            })
            .collect();
        assert_eq!(dots.len(), 11);
        assert_eq!(dots[5], (ThemeToken::NavDotActive, Some(5)));
        assert_eq!(dots[6], (ThemeToken::NavDot, Some(8)));
        assert_eq!(
            dots.iter()
                .filter(|(c, _)| *c == ThemeToken::NavDotActive)
                .count(),
            1
        );
    }

    #[test]
    fn dots_hit_test_to_section_start() {
        let s =
            Sequencer::mount(SequencerConfig::default(), &DeviceProfile::desktop(1280.0)).unwrap();
        let vp = Viewport::new(120.0, 40.0);
        let cmds = render_nav(s.step_map(), &s.view(), &vp);
        // dot = 1, column of 21 cells starting at y = 9, x = 118.
        assert_eq!(hit_test(&cmds, Point::new(118.5, 9.5)), Some(0));
        assert_eq!(hit_test(&cmds, Point::new(118.5, 19.5)), Some(5));
        assert_eq!(hit_test(&cmds, Point::new(118.5, 10.5)), None);
    }
}
