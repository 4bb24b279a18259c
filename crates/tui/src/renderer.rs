use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use scrolly_core::views::{hit_test, render_frame};
use scrolly_core::{DeviceClass, Millis, Sequencer};
use scrolly_protocol::{HostEvent, NavKey, Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use tracing::debug;

use crate::scroll::NativeScroll;

/// Wheel notches are reported as a fixed line delta, well above the
/// default threshold.
const WHEEL_DELTA: f64 = 100.0;
/// Rows per wheel notch when scrolling natively.
const NATIVE_WHEEL_ROWS: f64 = 3.0;
const IDLE_POLL: Duration = Duration::from_millis(100);
const ANIMATION_POLL: Duration = Duration::from_millis(16);
const BOLD_FONT_SIZE: f64 = 24.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::SectionEven => Color::Rgb(18, 22, 32),
        ThemeToken::SectionOdd => Color::Rgb(26, 30, 44),
        ThemeToken::SectionTitle => Color::White,
        ThemeToken::SectionBody => Color::Gray,
        ThemeToken::StepPast => Color::Rgb(40, 90, 60),
        ThemeToken::StepActive => Color::Green,
        ThemeToken::StepFuture => Color::Rgb(50, 50, 60),
        ThemeToken::StepText => Color::White,
        ThemeToken::NavDot => Color::DarkGray,
        ThemeToken::NavDotActive => Color::LightCyan,
        ThemeToken::ModalScrim => Color::Rgb(8, 8, 8),
        ThemeToken::ModalSurface => Color::Rgb(40, 40, 60),
        ThemeToken::ModalText => Color::White,
    }
}

/// Terminal session around a mounted sequencer.
struct App {
    sequencer: Sequencer,
    started: Instant,
    /// Only used when the tracker is mounted.
    native: Option<NativeScroll>,
    viewport: Viewport,
}

impl App {
    fn new(sequencer: Sequencer) -> Self {
        let native = (sequencer.device_class() == DeviceClass::Mobile).then(NativeScroll::default);
        Self {
            sequencer,
            started: Instant::now(),
            native,
            viewport: Viewport::new(0.0, 0.0),
        }
    }

    fn now(&self) -> Millis {
        Millis::try_from(self.started.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if let Some(native) = self.native.as_mut() {
            native.scroll_to_index(self.sequencer.index(), self.sequencer.step_map(), &viewport);
        }
    }

    fn offset_vh(&self, now: Millis) -> f64 {
        match &self.native {
            Some(native) => native.offset_vh(&self.viewport),
            None => self.sequencer.animated_offset(now),
        }
    }

    fn frame(&self, now: Millis) -> Vec<RenderCommand> {
        let view = self.sequencer.view();
        render_frame(
            self.sequencer.step_map(),
            &view,
            &self.viewport,
            self.offset_vh(now),
        )
    }

    fn animating(&self, now: Millis) -> bool {
        self.native.is_none()
            && (!self.sequencer.transition().is_done(now)
                || self.sequencer.store().is_transitioning())
    }

    fn header(&self) -> String {
        let view = self.sequencer.view();
        let mode = match self.sequencer.device_class() {
            DeviceClass::Desktop => "paged",
            DeviceClass::Mobile => "native scroll",
        };
        let pinned = self.sequencer.step_map().entry_for_index(view.index).is_pinned();
        let sub_step = if pinned {
            format!(" | sub-step {}/{}", view.active_sub_step, view.sub_steps.len())
        } else {
            String::new()
        };
        format!(
            " scrolly ({mode}) | {} | step {}/{}{sub_step} | {} ",
            view.section_label,
            view.index + 1,
            view.total_steps,
            "arrows PgUp/PgDn Home End | m modal | q quit",
        )
    }

    fn key(&mut self, key: NavKey, now: Millis) {
        match self.native.as_mut() {
            None => {
                let d = self.sequencer.handle(&HostEvent::Key { key }, now);
                debug!(?key, ?d, "key");
            }
            Some(native) => {
                let map = self.sequencer.step_map();
                let page = self.viewport.height;
                let rows = match key {
                    NavKey::ArrowDown => 1.0,
                    NavKey::ArrowUp => -1.0,
                    NavKey::PageDown => page,
                    NavKey::PageUp => -page,
                    NavKey::Home => f64::NEG_INFINITY,
                    NavKey::End => f64::INFINITY,
                };
                native.scroll_by(rows, map, &self.viewport);
                self.report_intersections(now);
            }
        }
    }

    fn wheel(&mut self, down: bool, now: Millis) {
        let sign = if down { 1.0 } else { -1.0 };
        match self.native.as_mut() {
            None => {
                let d = self.sequencer.handle(
                    &HostEvent::Wheel {
                        delta_y: sign * WHEEL_DELTA,
                    },
                    now,
                );
                debug!(?d, "wheel");
            }
            Some(native) => {
                native.scroll_by(
                    sign * NATIVE_WHEEL_ROWS,
                    self.sequencer.step_map(),
                    &self.viewport,
                );
                self.report_intersections(now);
            }
        }
    }

    fn click(&mut self, point: Point, now: Millis) {
        let Some(target) = hit_test(&self.frame(now), point) else {
            return;
        };
        if !self.sequencer.go_to(target as i64, now) {
            return;
        }
        if let Some(native) = self.native.as_mut() {
            native.scroll_to_index(
                self.sequencer.index(),
                self.sequencer.step_map(),
                &self.viewport,
            );
        }
    }

    fn report_intersections(&mut self, now: Millis) {
        let Some(native) = &self.native else {
            return;
        };
        let entries = native.intersections(self.sequencer.step_map(), &self.viewport);
        let d = self
            .sequencer
            .handle(&HostEvent::Intersections { entries }, now);
        debug!(top = native.top(), ?d, "intersections");
    }

    fn toggle_modal(&mut self) {
        let open = !self.sequencer.view().modal_open;
        self.sequencer.set_modal_open(open);
    }
}

pub fn run(sequencer: Sequencer) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, App::new(sequencer));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        let term_size = terminal.size()?;
        app.resize(Viewport::new(
            f64::from(term_size.width),
            f64::from(term_size.height.saturating_sub(1)),
        ));

        let now = app.now();
        app.sequencer.tick(now);
        let cmds = app.frame(now);
        let header_text = app.header();

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(header_text)
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let block = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(theme_to_color(ThemeToken::Background)));
            frame.render_widget(block, content_area);

            paint(frame.buffer_mut(), content_area, &cmds);
        })?;

        let timeout = if app.animating(now) {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };
        if !event::poll(timeout)? {
            continue;
        }
        let now = app.now();
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc if app.sequencer.view().modal_open => app.toggle_modal(),
                KeyCode::Esc => break,
                KeyCode::Char('m') => app.toggle_modal(),
                KeyCode::Down => app.key(NavKey::ArrowDown, now),
                KeyCode::Up => app.key(NavKey::ArrowUp, now),
                KeyCode::PageDown | KeyCode::Char(' ') => app.key(NavKey::PageDown, now),
                KeyCode::PageUp => app.key(NavKey::PageUp, now),
                KeyCode::Home => app.key(NavKey::Home, now),
                KeyCode::End => app.key(NavKey::End, now),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => app.wheel(true, now),
                MouseEventKind::ScrollUp => app.wheel(false, now),
                MouseEventKind::Down(MouseButton::Left) if mouse.row > 0 => {
                    let point = Point::new(
                        f64::from(mouse.column) + 0.5,
                        f64::from(mouse.row - 1) + 0.5,
                    );
                    app.click(point, now);
                }
                _ => {}
            },
            _ => {}
        }
    }
    Ok(())
}

/// Half-open cell span covering `[start, start + len)`, at least one cell
/// wide when `len` is positive.
fn cell_span(start: f64, len: f64) -> (i64, i64) {
    let a = start.round() as i64;
    let b = (start + len).round() as i64;
    if len > 0.0 && b <= a {
        (a, a + 1)
    } else {
        (a, b)
    }
}

/// Cell bounds `(x0, y0, x1, y1)` relative to the content area.
type CellBounds = (i64, i64, i64, i64);

fn cell_bounds(rect: scrolly_protocol::Rect) -> CellBounds {
    let (x0, x1) = cell_span(rect.x, rect.w);
    let (y0, y1) = cell_span(rect.y, rect.h);
    (x0, y0, x1, y1)
}

fn intersect(a: CellBounds, b: CellBounds) -> CellBounds {
    (a.0.max(b.0), a.1.max(b.1), a.2.min(b.2), a.3.min(b.3))
}

/// Buffer position of a content cell, if it lies inside `bounds`.
fn cell(area: Rect, x: i64, y: i64, bounds: CellBounds) -> Option<(u16, u16)> {
    if x < bounds.0 || x >= bounds.2 || y < bounds.1 || y >= bounds.3 {
        return None;
    }
    let x = u16::try_from(x).ok()?;
    let y = u16::try_from(y).ok()?;
    Some((area.x.checked_add(x)?, area.y.checked_add(y)?))
}

/// Draw render commands into `area`, one view unit per cell.
fn paint(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    let screen: CellBounds = (0, 0, i64::from(area.width), i64::from(area.height));
    let mut offsets = vec![Point::new(0.0, 0.0)];
    let mut clip = screen;

    for cmd in commands {
        let top = offsets.last().copied().unwrap_or(Point::new(0.0, 0.0));
        match cmd {
            RenderCommand::PushTransform { translate } => {
                offsets.push(Point::new(top.x + translate.x, top.y + translate.y));
            }
            RenderCommand::PopTransform => {
                if offsets.len() > 1 {
                    offsets.pop();
                }
            }
            RenderCommand::SetClip { rect } => clip = intersect(screen, cell_bounds(*rect)),
            RenderCommand::ClearClip => clip = screen,
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let bounds = cell_bounds(rect.translated(top.x, top.y));
                let visible = intersect(bounds, clip);
                let (x0, y0, x1, y1) = bounds;
                let bg = theme_to_color(*color);
                for y in visible.1..visible.3 {
                    for x in visible.0..visible.2 {
                        if let Some(pos) = cell(area, x, y, visible) {
                            buf[pos].set_char(' ').set_bg(bg);
                        }
                    }
                }
                let framed = x1 - x0 >= 2 && y1 - y0 >= 2;
                if let (Some(border), true) = (border_color, framed) {
                    let fg = theme_to_color(*border);
                    for y in y0..y1 {
                        for x in x0..x1 {
                            let ch = match (x == x0, x == x1 - 1, y == y0, y == y1 - 1) {
                                (true, _, true, _) => '┌',
                                (_, true, true, _) => '┐',
                                (true, _, _, true) => '└',
                                (_, true, _, true) => '┘',
                                (_, _, true, _) | (_, _, _, true) => '─',
                                (true, _, _, _) | (_, true, _, _) => '│',
                                _ => continue,
                            };
                            if let Some(pos) = cell(area, x, y, visible) {
                                buf[pos].set_char(ch).set_fg(fg);
                            }
                        }
                    }
                }
                if let Some(label) = label {
                    let width = (x1 - x0 - 2).max(0) as usize;
                    if width > 0 {
                        let y = y0 + (y1 - y0) / 2;
                        let fg = theme_to_color(ThemeToken::StepText);
                        for (i, ch) in label.chars().take(width).enumerate() {
                            if let Some(pos) = cell(area, x0 + 1 + i as i64, y, visible) {
                                buf[pos].set_char(ch).set_fg(fg);
                            }
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let len = text.chars().count() as f64;
                let x = position.x + top.x;
                let start = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x - len / 2.0,
                    TextAlign::Right => x - len,
                };
                let x0 = start.round() as i64;
                let y = (position.y + top.y).floor() as i64;
                let mut style = Style::default().fg(theme_to_color(*color));
                if *font_size >= BOLD_FONT_SIZE {
                    style = style.add_modifier(Modifier::BOLD);
                }
                for (i, ch) in text.chars().enumerate() {
                    if let Some(pos) = cell(area, x0 + i as i64, y, clip) {
                        buf[pos].set_char(ch).set_style(style);
                    }
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}
