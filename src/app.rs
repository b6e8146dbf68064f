//! App: terminal init, main loop, mouse and key handling, clock ticks.

use crate::dispatch::{self, Affordance};
use crate::game::LotteryState;
use crate::geometry::{CELL_COUNT, GRID_COLS, cell_center};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, Button, ScreenLayout, ToastFx};
use crate::{Args, LotteryConfig};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Countdown refresh period.
const CLOCK_TICK: Duration = Duration::from_secs(1);

fn wall_clock() -> DateTime<Local> {
    Local::now()
}

pub struct App {
    args: Args,
    theme: Theme,
    state: LotteryState,
    /// Last layout drawn; mouse positions are resolved against it.
    layout: Option<ScreenLayout>,
    affordance: Affordance,
    /// Keyboard cursor over the grid. Set once a cursor key is used.
    cursor: Option<usize>,
    toast: ToastFx,
    dirty: bool,
    next_clock_tick: Instant,
}

impl App {
    pub fn new(args: Args, config: LotteryConfig, theme: Theme) -> Result<Self> {
        let state = LotteryState::new(config, wall_clock());
        Ok(Self {
            args,
            theme,
            state,
            layout: None,
            affordance: Affordance::Default,
            cursor: None,
            toast: ToastFx::default(),
            dirty: true,
            next_clock_tick: Instant::now() + CLOCK_TICK,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);
        self.state.shutdown();

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        terminal.show_cursor()?;

        result
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.args.frame_rate.max(1.0))
    }

    /// True while something moves on screen without input.
    fn animating(&self) -> bool {
        self.state.wants_frames() || (!self.args.no_animation && self.toast.is_running())
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            if self.dirty || self.animating() {
                let (state, theme, affordance) = (&self.state, &self.theme, self.affordance);
                let (toast, animate) = (&mut self.toast, !self.args.no_animation);
                let mut drawn = None;
                terminal.draw(|f| {
                    drawn = Some(ui::draw(f, state, theme, affordance, toast, now, animate));
                })?;
                self.layout = drawn;
                self.dirty = false;
            }

            let mut deadline = self.next_clock_tick;
            if let Some(due) = self.state.next_wakeup() {
                deadline = deadline.min(due);
            }
            if self.animating() {
                deadline = deadline.min(now + self.frame_interval());
            }
            let timeout = deadline.saturating_duration_since(Instant::now());

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            let action = key_to_action(key);
                            if action == Action::Quit {
                                tracing::info!(tickets = self.state.tickets().len(), "Quit");
                                return Ok(());
                            }
                            self.apply_action(action, Instant::now());
                        }
                        Event::Mouse(mouse) => self.handle_mouse(mouse, Instant::now()),
                        Event::Resize(..) => self.dirty = true,
                        _ => {}
                    }
                }
            }

            let now = Instant::now();
            if self.state.advance(now) {
                self.refresh_affordance();
                self.dirty = true;
            }
            if now >= self.next_clock_tick {
                self.state.tick_clock(wall_clock());
                self.next_clock_tick = now + CLOCK_TICK;
                self.dirty = true;
            }
        }
    }

    fn refresh_affordance(&mut self) {
        self.affordance = dispatch::current_affordance(&self.state);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let Some(layout) = self.layout else {
            return;
        };
        let viewport = layout.viewport();
        let (sx, sy) = ui::mouse_point(mouse.column, mouse.row);
        let on_canvas = layout.canvas_visible() && viewport.contains(sx, sy);
        let point = viewport.to_logical(sx, sy);

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let before = (self.state.hover(), self.affordance);
                self.cursor = None;
                self.affordance = if on_canvas {
                    dispatch::pointer_move(&mut self.state, point)
                } else {
                    dispatch::pointer_leave(&mut self.state)
                };
                if before != (self.state.hover(), self.affordance) {
                    self.dirty = true;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(button) = layout.button_at(mouse.column, mouse.row) {
                    self.press(button, now);
                } else if on_canvas {
                    if let Some(Err(err)) = dispatch::click(&mut self.state, point, now) {
                        tracing::debug!(%err, "Click rejected");
                    }
                    self.refresh_affordance();
                    self.dirty = true;
                }
            }
            _ => {}
        }
    }

    fn press(&mut self, button: Button, now: Instant) {
        match button {
            Button::QuickFive => self.apply_action(Action::QuickFive, now),
            Button::QuickTen => self.apply_action(Action::QuickTen, now),
            Button::Buy => self.apply_action(Action::Buy, now),
            Button::Reset => self.apply_action(Action::Reset, now),
        }
    }

    fn apply_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::QuickFive => {
                self.state.quick_select(5);
            }
            Action::QuickTen => {
                self.state.quick_select(10);
            }
            Action::Buy => {
                // Rejections post their own message.
                let _ = self.state.buy_ticket(now, wall_clock());
            }
            Action::Reset => self.state.reset_ticket(),
            Action::CursorLeft => self.move_cursor(-1, 0),
            Action::CursorRight => self.move_cursor(1, 0),
            Action::CursorUp => self.move_cursor(0, -1),
            Action::CursorDown => self.move_cursor(0, 1),
            Action::ToggleCursor => {
                if let Some(center) = self.cursor.and_then(cell_center) {
                    let _ = dispatch::click(&mut self.state, center, now);
                }
            }
            Action::Quit | Action::None => return,
        }
        self.refresh_affordance();
        self.dirty = true;
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let index = match self.cursor.or(self.state.hover()) {
            None => 0,
            Some(i) => {
                let cols = GRID_COLS as isize;
                let rows = (CELL_COUNT / GRID_COLS) as isize;
                let col = (i as isize % cols + dx).rem_euclid(cols);
                let row = (i as isize / cols + dy).rem_euclid(rows);
                (row * cols + col) as usize
            }
        };
        self.cursor = Some(index);
        if let Some(center) = cell_center(index) {
            dispatch::pointer_move(&mut self.state, center);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratatui::layout::Rect;

    fn app() -> App {
        let args = Args::try_parse_from(["jackpot-tui", "--seed", "5"]).unwrap();
        let config = LotteryConfig {
            seed: args.seed,
            ..LotteryConfig::default()
        };
        App::new(args, config, Theme::default()).unwrap()
    }

    #[test]
    fn test_cursor_wraps_around_grid() {
        let mut a = app();
        a.apply_action(Action::CursorRight, Instant::now());
        assert_eq!(a.cursor, Some(0));
        a.apply_action(Action::CursorLeft, Instant::now());
        assert_eq!(a.cursor, Some(4));
        a.apply_action(Action::CursorUp, Instant::now());
        assert_eq!(a.cursor, Some(19));
        assert_eq!(a.state.hover(), Some(19));
    }

    #[test]
    fn test_space_toggles_cursor_ball() {
        let mut a = app();
        let now = Instant::now();
        a.apply_action(Action::CursorDown, now);
        a.apply_action(Action::ToggleCursor, now);
        assert!(a.state.selection().is_selected(0));
        a.apply_action(Action::ToggleCursor, now);
        assert!(a.state.selection().is_empty());
    }

    #[test]
    fn test_buy_flow_through_actions() {
        let mut a = app();
        let now = Instant::now();
        a.apply_action(Action::Buy, now);
        assert!(a.state.message().is_some());
        assert_eq!(a.state.credits(), 500);
        a.apply_action(Action::QuickTen, now);
        assert_eq!(a.state.selection().len(), 10);
        a.apply_action(Action::Buy, now);
        assert_eq!(a.state.credits(), 475);
        assert!(a.state.is_animating());
        assert!(a.animating());
        a.press(Button::Reset, now);
        assert!(a.state.selection().is_empty());
    }

    #[test]
    fn test_mouse_ignored_before_first_draw() {
        let mut a = app();
        a.handle_mouse(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 10,
                row: 10,
                modifiers: crossterm::event::KeyModifiers::NONE,
            },
            Instant::now(),
        );
        assert!(a.state.selection().is_empty());
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: crossterm::event::KeyModifiers::NONE,
        }
    }

    /// Terminal cell over the centre of ball `index`.
    fn ball_cell(layout: &ScreenLayout, index: usize) -> (u16, u16) {
        let target = cell_center(index).unwrap();
        let c = layout.canvas;
        (
            c.x + (target.x / 1000.0 * c.width as f32) as u16,
            c.y + (target.y / 1000.0 * c.height as f32) as u16,
        )
    }

    #[test]
    fn test_mouse_routes_to_canvas_and_buttons() {
        let mut a = app();
        let layout = ui::screen_layout(Rect::new(0, 0, 120, 40));
        a.layout = Some(layout);
        let now = Instant::now();
        let left = MouseEventKind::Down(MouseButton::Left);

        let (col, row) = ball_cell(&layout, 7);
        a.handle_mouse(mouse(MouseEventKind::Moved, col, row), now);
        assert_eq!(a.state.hover(), Some(7));
        assert_eq!(a.affordance, Affordance::Pointer);

        a.handle_mouse(mouse(left, col, row), now);
        assert_eq!(a.state.selection().picked(), &[8]);

        a.handle_mouse(mouse(MouseEventKind::Moved, 0, 0), now);
        assert_eq!(a.state.hover(), None);
        assert_eq!(a.affordance, Affordance::Default);

        let quick_ten = layout.buttons[1];
        a.handle_mouse(mouse(left, quick_ten.x + 1, quick_ten.y + 1), now);
        assert_eq!(a.state.selection().len(), 10);

        let buy = layout.buttons[2];
        a.handle_mouse(mouse(left, buy.x + 1, buy.y + 1), now);
        assert_eq!(a.state.credits(), 475);
        assert!(a.state.is_animating());
    }

    #[test]
    fn test_drag_hovers_like_move() {
        let mut a = app();
        let layout = ui::screen_layout(Rect::new(0, 0, 120, 40));
        a.layout = Some(layout);
        let (col, row) = ball_cell(&layout, 12);
        a.handle_mouse(
            mouse(MouseEventKind::Drag(MouseButton::Left), col, row),
            Instant::now(),
        );
        assert_eq!(a.state.hover(), Some(12));
    }

    #[test]
    fn test_hidden_canvas_takes_no_pointer_input() {
        let mut a = app();
        let mut layout = ui::screen_layout(Rect::new(0, 0, 120, 40));
        layout.canvas = Rect::new(10, 6, 8, 4);
        assert!(!layout.canvas_visible());
        a.layout = Some(layout);
        let now = Instant::now();
        let (col, row) = ball_cell(&layout, 0);
        a.handle_mouse(mouse(MouseEventKind::Moved, col, row), now);
        assert_eq!(a.state.hover(), None);
        a.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), col, row), now);
        assert!(a.state.selection().is_empty());
    }
}
