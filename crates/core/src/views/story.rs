use scrolly_protocol::{
    Point, Rect, RenderCommand, SequencerView, SubStepState, TextAlign, ThemeToken, Viewport,
};

use crate::step_map::{StepEntry, StepMap};

const TITLE_FONT_SIZE: f64 = 32.0;
const BODY_FONT_SIZE: f64 = 16.0;
const TITLE_Y_FRAC: f64 = 0.2;
const CARD_ROW_Y_FRAC: f64 = 0.4;
const CARD_HEIGHT_FRAC: f64 = 0.3;
const CARD_ROW_WIDTH_FRAC: f64 = 0.8;
const CARD_GAP_FRAC: f64 = 0.02;
const MODAL_WIDTH_FRAC: f64 = 0.5;
const MODAL_HEIGHT_FRAC: f64 = 0.4;

/// Render the stacked full-viewport sections.
///
/// `offset_vh` is the story offset to draw at. Pass the view's `offset_vh`
/// for a static frame or a transition sample for an animated one. Sections
/// are laid out one page apart and shifted up by a single transform, so the
/// pinned section stays put while its sub-step cards change state.
pub fn render_story(
    map: &StepMap,
    view: &SequencerView,
    viewport: &Viewport,
    offset_vh: f64,
) -> Vec<RenderCommand> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }

    let page_h = viewport.vh(map.page_size_vh());
    let shift = viewport.vh(offset_vh);
    let mut commands = Vec::with_capacity(map.entries().len() * 4 + 16);

    commands.push(RenderCommand::BeginGroup {
        id: "story".into(),
        label: Some("Story".into()),
    });
    commands.push(RenderCommand::SetClip {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
    });
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(0.0, -shift),
    });

    for entry in map.entries() {
        let top = viewport.vh(entry.offset_vh);
        // Cull sections entirely outside the visible window.
        if top + page_h <= shift || top >= shift + viewport.height {
            continue;
        }
        let frame = SectionFrame {
            top,
            height: page_h,
            count: map.entries().len(),
        };
        render_section(&mut commands, entry, view, viewport, &frame);
    }

    commands.push(RenderCommand::PopTransform);
    commands.push(RenderCommand::ClearClip);

    if view.modal_open {
        render_modal(&mut commands, viewport);
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

/// Where one section lands in story coordinates.
struct SectionFrame {
    top: f64,
    height: f64,
    count: usize,
}

fn render_section(
    commands: &mut Vec<RenderCommand>,
    entry: &StepEntry,
    view: &SequencerView,
    viewport: &Viewport,
    frame: &SectionFrame,
) {
    let SectionFrame {
        top,
        height: page_h,
        count: section_count,
    } = *frame;
    commands.push(RenderCommand::BeginGroup {
        id: format!("story-section-{}", entry.ordinal),
        label: Some(entry.label.clone()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, top, viewport.width, page_h),
        color: if entry.ordinal % 2 == 0 {
            ThemeToken::SectionEven
        } else {
            ThemeToken::SectionOdd
        },
        border_color: Some(ThemeToken::Border),
        label: None,
        target: None,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(viewport.width / 2.0, top + page_h * TITLE_Y_FRAC),
        text: entry.label.clone(),
        color: ThemeToken::SectionTitle,
        font_size: TITLE_FONT_SIZE,
        align: TextAlign::Center,
    });

    if entry.is_pinned() {
        render_sub_steps(commands, entry, view, viewport, top, page_h);
    } else {
        commands.push(RenderCommand::DrawText {
            position: Point::new(viewport.width / 2.0, top + page_h * CARD_ROW_Y_FRAC),
            text: format!("{} / {}", entry.ordinal + 1, section_count),
            color: ThemeToken::SectionBody,
            font_size: BODY_FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
}

fn render_sub_steps(
    commands: &mut Vec<RenderCommand>,
    entry: &StepEntry,
    view: &SequencerView,
    viewport: &Viewport,
    top: f64,
    page_h: f64,
) {
    let count = entry.sub_steps.len() as f64;
    let row_w = viewport.width * CARD_ROW_WIDTH_FRAC;
    let gap = viewport.width * CARD_GAP_FRAC;
    let card_w = ((row_w - gap * (count - 1.0)) / count).max(1.0);
    let card_h = page_h * CARD_HEIGHT_FRAC;
    let row_x = (viewport.width - row_w) / 2.0;
    let row_y = top + page_h * CARD_ROW_Y_FRAC;

    for (k, label) in entry.sub_steps.iter().enumerate() {
        let state = view
            .sub_steps
            .get(k)
            .copied()
            .unwrap_or(SubStepState::Future);
        let x = row_x + k as f64 * (card_w + gap);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, row_y, card_w, card_h),
            color: state_token(state),
            border_color: (state == SubStepState::Active).then_some(ThemeToken::Border),
            label: Some(format!("{}. {label}", k + 1)),
            target: Some(entry.first + k),
        });
    }
}

/// Theme token for a pinned sub-step card.
pub fn state_token(state: SubStepState) -> ThemeToken {
    match state {
        SubStepState::Past => ThemeToken::StepPast,
        SubStepState::Active => ThemeToken::StepActive,
        SubStepState::Future => ThemeToken::StepFuture,
    }
}

fn render_modal(commands: &mut Vec<RenderCommand>, viewport: &Viewport) {
    let w = viewport.width * MODAL_WIDTH_FRAC;
    let h = viewport.height * MODAL_HEIGHT_FRAC;
    let x = (viewport.width - w) / 2.0;
    let y = (viewport.height - h) / 2.0;

    commands.push(RenderCommand::BeginGroup {
        id: "lead-modal".into(),
        label: Some("Lead capture".into()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        color: ThemeToken::ModalScrim,
        border_color: None,
        label: None,
        target: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(x, y, w, h),
        color: ThemeToken::ModalSurface,
        border_color: Some(ThemeToken::Border),
        label: None,
        target: None,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(viewport.width / 2.0, y + h / 2.0),
        text: "Let's talk".into(),
        color: ThemeToken::ModalText,
        font_size: TITLE_FONT_SIZE,
        align: TextAlign::Center,
    });
    commands.push(RenderCommand::EndGroup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SequencerConfig;
    use crate::sequencer::Sequencer;
    use crate::views::hit_test;
    use scrolly_protocol::DeviceProfile;

    fn mounted() -> Sequencer {
        Sequencer::mount(SequencerConfig::default(), &DeviceProfile::desktop(1280.0)).unwrap()
    }

    fn section_groups(cmds: &[RenderCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { id, .. } if id.starts_with("story-section-") => {
                    Some(id.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn card_colors(cmds: &[RenderCommand]) -> Vec<(ThemeToken, usize)> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    color,
                    target: Some(t),
                    ..
                } => Some((*color, *t)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn resting_frame_draws_one_section() {
        let s = mounted();
        let vp = Viewport::new(1280.0, 800.0);
        let view = s.view();
        let cmds = render_story(s.step_map(), &view, &vp, view.offset_vh);
        assert_eq!(section_groups(&cmds), vec!["story-section-0"]);
        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
    }

    #[test]
    fn mid_transition_draws_neighbors() {
        let s = mounted();
        let vp = Viewport::new(1280.0, 800.0);
        let cmds = render_story(s.step_map(), &s.view(), &vp, 450.0);
        assert_eq!(
            section_groups(&cmds),
            vec!["story-section-4", "story-section-5"]
        );
    }

    #[test]
    fn pinned_cards_follow_sub_step_state() {
        let mut s = mounted();
        s.go_to(6, 0);
        let vp = Viewport::new(1280.0, 800.0);
        let view = s.view();
        let cmds = render_story(s.step_map(), &view, &vp, view.offset_vh);
        assert_eq!(
            card_colors(&cmds),
            vec![
                (ThemeToken::StepPast, 5),
                (ThemeToken::StepActive, 6),
                (ThemeToken::StepFuture, 7)
            ]
        );
    }

    #[test]
    fn cards_are_clickable_through_transform() {
        let mut s = mounted();
        s.go_to(5, 0);
        let vp = Viewport::new(1000.0, 1000.0);
        let view = s.view();
        let cmds = render_story(s.step_map(), &view, &vp, view.offset_vh);
        // Row spans x 100..900 at y 400..700 once shifted into view.
        assert_eq!(hit_test(&cmds, Point::new(850.0, 500.0)), Some(7));
        assert_eq!(hit_test(&cmds, Point::new(150.0, 500.0)), Some(5));
        assert_eq!(hit_test(&cmds, Point::new(500.0, 100.0)), None);
    }

    #[test]
    fn open_modal_adds_overlay() {
        let mut s = mounted();
        s.set_modal_open(true);
        let vp = Viewport::new(1280.0, 800.0);
        let view = s.view();
        let cmds = render_story(s.step_map(), &view, &vp, view.offset_vh);
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::BeginGroup { id, .. } if id == "lead-modal"
        )));
    }

    #[test]
    fn modal_scrim_blocks_card_clicks() {
        let mut s = mounted();
        s.go_to(5, 0);
        s.set_modal_open(true);
        let vp = Viewport::new(1000.0, 1000.0);
        let view = s.view();
        let cmds = render_story(s.step_map(), &view, &vp, view.offset_vh);
        assert_eq!(hit_test(&cmds, Point::new(150.0, 500.0)), None);
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        let s = mounted();
        let cmds = render_story(s.step_map(), &s.view(), &Viewport::new(0.0, 0.0), 0.0);
        assert!(cmds.is_empty());
    }
}
