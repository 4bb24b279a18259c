pub mod nav;
pub mod story;

use scrolly_protocol::{Point, Rect, RenderCommand, SequencerView, Viewport};

use crate::step_map::StepMap;

/// Full frame: the story, then the navigation dots on top.
///
/// The dots are left out while the lead-capture modal is open so nothing
/// behind the overlay stays clickable.
pub fn render_frame(
    map: &StepMap,
    view: &SequencerView,
    viewport: &Viewport,
    offset_vh: f64,
) -> Vec<RenderCommand> {
    let mut commands = story::render_story(map, view, viewport, offset_vh);
    if !view.modal_open {
        commands.extend(nav::render_nav(map, view, viewport));
    }
    commands
}

/// Find the jump target under `point`, honoring transforms and clips.
///
/// Later commands draw on top, so the last rectangle containing the point
/// decides. An untargeted rectangle on top (such as a modal scrim) hides
/// whatever is below it.
pub fn hit_test(commands: &[RenderCommand], point: Point) -> Option<usize> {
    let mut offsets = vec![Point::new(0.0, 0.0)];
    let mut clip: Option<Rect> = None;
    let mut hit = None;

    for cmd in commands {
        match cmd {
            RenderCommand::PushTransform { translate } => {
                let top = offsets.last().copied().unwrap_or(Point::new(0.0, 0.0));
                offsets.push(Point::new(top.x + translate.x, top.y + translate.y));
            }
            RenderCommand::PopTransform => {
                if offsets.len() > 1 {
                    offsets.pop();
                }
            }
            RenderCommand::SetClip { rect } => clip = Some(*rect),
            RenderCommand::ClearClip => clip = None,
            RenderCommand::DrawRect { rect, target, .. } => {
                if clip.is_some_and(|c| !c.contains(point)) {
                    continue;
                }
                let top = offsets.last().copied().unwrap_or(Point::new(0.0, 0.0));
                if rect.translated(top.x, top.y).contains(point) {
                    hit = *target;
                }
            }
            _ => {}
        }
    }
    hit
}
