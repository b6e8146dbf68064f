//! Layout and drawing: header, draw line, canvas, buttons, status bar and toast.

use crate::dispatch::{Affordance, Viewport};
use crate::game::{LotteryState, MessageKind};
use crate::records::PRIZE;
use crate::render;
use crate::surface::{Raster, Rgba};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Message fade-in length.
const TOAST_FADE_MS: u32 = 250;
/// Luminance gap below which a label falls back to its shadow background.
const MIN_LABEL_CONTRAST: f32 = 0.35;
/// Smallest canvas (in cells) worth drawing.
const MIN_CANVAS_CELLS: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    QuickFive,
    QuickTen,
    Buy,
    Reset,
}

impl Button {
    pub const ALL: [Self; 4] = [Self::QuickFive, Self::QuickTen, Self::Buy, Self::Reset];

    fn label(self, price: u32) -> String {
        match self {
            Self::QuickFive => "Quick 5".to_string(),
            Self::QuickTen => "Quick 10".to_string(),
            Self::Buy => format!("BUY TICKET {price}"),
            Self::Reset => "RESET".to_string(),
        }
    }

    fn enabled(self, state: &LotteryState) -> bool {
        match self {
            Self::QuickFive | Self::QuickTen => state.can_quick_select(),
            Self::Buy => state.can_buy(),
            Self::Reset => true,
        }
    }
}

/// Where everything goes for one terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub draw_info: Rect,
    /// Canvas in cells. Square in pixels: each cell holds two pixel rows.
    pub canvas: Rect,
    pub buttons: [Rect; 4],
    pub status: Rect,
}

impl ScreenLayout {
    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let pos = Position::new(column, row);
        Button::ALL
            .into_iter()
            .zip(self.buttons)
            .find_map(|(button, rect)| rect.contains(pos).then_some(button))
    }

    /// The canvas in half-cell units, matching [`mouse_point`].
    pub fn viewport(&self) -> Viewport {
        Viewport {
            x: self.canvas.x as f32,
            y: self.canvas.y as f32 * 2.0,
            width: self.canvas.width as f32,
            height: self.canvas.height as f32 * 2.0,
        }
    }

    /// False when the terminal is too small to draw the canvas; it then takes no pointer input.
    pub fn canvas_visible(&self) -> bool {
        self.canvas.width >= MIN_CANVAS_CELLS
    }

    /// Toast box over the top of the canvas.
    fn toast(&self, text_width: u16) -> Rect {
        let width = (text_width + 4).min(self.canvas.width);
        Rect {
            x: self.canvas.x + self.canvas.width.saturating_sub(width) / 2,
            y: self.canvas.y + 1.min(self.canvas.height),
            width,
            height: 3.min(self.canvas.height),
        }
    }
}

/// Centre of a terminal cell in half-cell units (one unit per pixel row).
pub fn mouse_point(column: u16, row: u16) -> (f32, f32) {
    (column as f32 + 0.5, row as f32 * 2.0 + 1.0)
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let [header, draw_info, body, button_row, status] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Min(MIN_CANVAS_CELLS / 2),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let rows = body.height.min(body.width / 2);
    let cols = rows * 2;
    let canvas = Rect {
        x: body.x + body.width.saturating_sub(cols) / 2,
        y: body.y + body.height.saturating_sub(rows) / 2,
        width: cols,
        height: rows,
    };

    let row_width = button_row.width.min(canvas.width.max(64));
    let row = Rect {
        x: button_row.x + button_row.width.saturating_sub(row_width) / 2,
        width: row_width,
        ..button_row
    };
    let buttons: [Rect; 4] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ])
    .spacing(1)
    .areas(row);

    ScreenLayout {
        header,
        draw_info,
        canvas,
        buttons,
        status,
    }
}

/// Fade-in for the current message. Restarts whenever a new message is posted.
#[derive(Default)]
pub struct ToastFx {
    serial: Option<u64>,
    effect: Option<Effect>,
    process_time: Option<Instant>,
}

impl ToastFx {
    pub fn is_running(&self) -> bool {
        self.effect.as_ref().is_some_and(|e| !e.done())
    }
}

/// Blits a [`Raster`] with half blocks: top pixel as foreground, bottom pixel as background.
/// Text labels are drawn as plain glyphs centred on their anchor.
pub struct CanvasWidget<'a> {
    raster: &'a Raster,
}

impl<'a> CanvasWidget<'a> {
    pub fn new(raster: &'a Raster) -> Self {
        Self { raster }
    }
}

impl Widget for CanvasWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let raster = self.raster;
        let cols = area.width.min(raster.width());
        let rows = area.height.min(raster.height() / 2);
        for cy in 0..rows {
            for cx in 0..cols {
                let top = raster.pixel(cx, cy * 2).unwrap_or(Rgba::BLACK);
                let bottom = raster.pixel(cx, cy * 2 + 1).unwrap_or(top);
                if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                    cell.set_char('▀')
                        .set_fg(top.to_color())
                        .set_bg(bottom.to_color());
                }
            }
        }

        for label in raster.labels() {
            let (px, py) = raster.to_pixel(label.anchor);
            let width = label.text.chars().count() as f32;
            let start = (px - width / 2.0).round();
            let row = (py / 2.0).floor();
            if start < 0.0 || row < 0.0 || row as u16 >= rows {
                continue;
            }
            let (start, row) = (start as u16, row as u16);
            for (i, ch) in label.text.chars().enumerate() {
                let cx = start + i as u16;
                if cx >= cols {
                    break;
                }
                let top = raster.pixel(cx, row * 2).unwrap_or(Rgba::BLACK);
                let bottom = raster.pixel(cx, row * 2 + 1).unwrap_or(top);
                let behind = label_background(
                    label.style.color,
                    top.lerp(bottom, 0.5),
                    label.style.shadow,
                );
                let mut style = Style::default()
                    .fg(label.style.color.to_color())
                    .bg(behind.to_color());
                if label.style.bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if let Some(cell) = buf.cell_mut((area.x + cx, area.y + row)) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }
}

/// Glyph background: the pixels under the label, or its shadow when the pixels
/// would swallow the text.
fn label_background(color: Rgba, behind: Rgba, shadow: Option<Rgba>) -> Rgba {
    match shadow {
        Some(shadow) if (color.luminance() - behind.luminance()).abs() < MIN_LABEL_CONTRAST => {
            behind.lerp(Rgba { a: 255, ..shadow }, shadow.a as f32 / 255.0)
        }
        _ => behind,
    }
}

/// Draw the whole screen. Returns the layout used, for mouse mapping.
pub fn draw(
    frame: &mut Frame,
    state: &LotteryState,
    theme: &Theme,
    affordance: Affordance,
    toast: &mut ToastFx,
    now: Instant,
    animate: bool,
) -> ScreenLayout {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    let layout = screen_layout(area);
    draw_header(frame, state, theme, layout.header);
    draw_draw_info(frame, state, theme, layout.draw_info);

    if !layout.canvas_visible() {
        Paragraph::new("Terminal too small")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.warning))
            .render(layout.draw_info, frame.buffer_mut());
    } else {
        let mut raster = Raster::new(layout.canvas.width, layout.canvas.height * 2);
        render::render(&mut raster, state, theme, state.animation_phase(now));
        CanvasWidget::new(&raster).render(layout.canvas, frame.buffer_mut());
    }

    draw_buttons(frame, state, theme, &layout);
    draw_status(frame, state, theme, affordance, layout.status);
    draw_toast(frame, state, theme, &layout, toast, now, animate);
    layout
}

fn draw_header(frame: &mut Frame, state: &LotteryState, theme: &Theme, area: Rect) {
    let [balance, prize, countdown] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ])
    .areas(area);
    let border = Style::default().fg(theme.div_line).bg(theme.bg);

    let lines = vec![
        Line::from(Span::styled(
            format!("{}.00", state.credits()),
            Style::default().fg(theme.title).bold(),
        )),
        Line::from(Span::styled(
            match state.tickets().last() {
                Some(last) => format!(
                    "Tickets: {} ({} at {})",
                    state.tickets().len(),
                    last.id,
                    last.purchase_date.format("%H:%M")
                ),
                None => "Tickets: 0".to_string(),
            },
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(" Bal KES ", Style::default().fg(theme.main_fg))),
        )
        .render(balance, frame.buffer_mut());

    let lines = vec![
        Line::from(Span::styled(
            PRIZE.name,
            Style::default().fg(theme.title).bold(),
        )),
        Line::from(vec![
            Span::styled(PRIZE.value, Style::default().fg(theme.main_fg)),
            Span::styled(
                format!("  [{}]", PRIZE.image),
                Style::default().fg(theme.inactive_fg),
            ),
        ]),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(" Jackpot ", Style::default().fg(theme.title))),
        )
        .render(prize, frame.buffer_mut());

    let lines = vec![
        Line::from(Span::styled(
            state.countdown().display().to_string(),
            Style::default().fg(theme.counter).bold(),
        )),
        Line::from(Span::styled(
            "until draw",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(" Next draw ", Style::default().fg(theme.main_fg))),
        )
        .render(countdown, frame.buffer_mut());
}

fn draw_draw_info(frame: &mut Frame, state: &LotteryState, theme: &Theme, area: Rect) {
    Paragraph::new(format!("© Draw: {}", state.countdown().draw_label()))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.main_fg).bg(theme.bg))
        .render(area, frame.buffer_mut());
}

fn draw_buttons(frame: &mut Frame, state: &LotteryState, theme: &Theme, layout: &ScreenLayout) {
    for (button, rect) in Button::ALL.into_iter().zip(layout.buttons) {
        let style = if !button.enabled(state) {
            Style::default().fg(theme.inactive_fg).bg(theme.bg)
        } else if button == Button::Buy {
            Style::default().fg(theme.bg).bg(theme.title).bold()
        } else {
            Style::default().fg(theme.main_fg).bg(theme.bg)
        };
        let border = if button.enabled(state) {
            theme.title
        } else {
            theme.div_line
        };
        Paragraph::new(button.label(state.ticket_price()))
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border).bg(theme.bg)),
            )
            .render(rect, frame.buffer_mut());
    }
}

fn affordance_hint(affordance: Affordance) -> &'static str {
    match affordance {
        Affordance::Pointer => "Click to pick",
        Affordance::NotAllowed => "10 numbers picked",
        Affordance::Default => "",
    }
}

fn draw_status(
    frame: &mut Frame,
    state: &LotteryState,
    theme: &Theme,
    affordance: Affordance,
    area: Rect,
) {
    let (hint, hint_style) = if state.is_animating() {
        ("Confirming ticket...", Style::default().fg(theme.success))
    } else if affordance == Affordance::NotAllowed {
        (affordance_hint(affordance), Style::default().fg(theme.warning))
    } else {
        (affordance_hint(affordance), Style::default().fg(theme.title))
    };
    let line = Line::from(vec![
        Span::styled(format!(" {hint:<20} "), hint_style),
        Span::styled(
            format!("{}/10 ", state.selection().len()),
            Style::default().fg(theme.counter),
        ),
        Span::styled(
            "| 5 Quick 5  0 Quick 10  Enter Buy  r Reset  Space Toggle  q Quit ",
            Style::default().fg(theme.inactive_fg),
        ),
    ]);
    Paragraph::new(line)
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());
}

fn draw_toast(
    frame: &mut Frame,
    state: &LotteryState,
    theme: &Theme,
    layout: &ScreenLayout,
    toast: &mut ToastFx,
    now: Instant,
    animate: bool,
) {
    let Some(message) = state.message() else {
        *toast = ToastFx::default();
        return;
    };
    let rect = layout.toast(message.text.chars().count() as u16);
    if rect.width < 3 || rect.height < 3 {
        return;
    }
    let color = match message.kind {
        MessageKind::Warning => theme.warning,
        MessageKind::Success => theme.success,
    };
    Clear.render(rect, frame.buffer_mut());
    Paragraph::new(message.text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bg(theme.bg).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color).bg(theme.bg)),
        )
        .render(rect, frame.buffer_mut());

    if !animate {
        return;
    }
    if toast.serial != Some(message.serial) {
        let bg = theme.canvas_bg;
        toast.serial = Some(message.serial);
        toast.effect = Some(fx::fade_from(bg, bg, (TOAST_FADE_MS, Interpolation::Linear)).with_area(rect));
        toast.process_time = None;
    }
    let delta = toast
        .process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    toast.process_time = Some(now);
    if let Some(effect) = toast.effect.as_mut() {
        if !effect.done() {
            frame.render_effect(effect, rect, TfxDuration::from_millis(delta_ms));
        }
    }
}
