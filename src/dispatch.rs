//! Pointer dispatch: screen coordinates → logical canvas → grid cell → state change.

use crate::game::LotteryState;
use crate::geometry::{CANVAS_SIZE, Point, hit_test, in_grid_band};
use crate::selection::{SelectionError, Toggle};
use std::time::Instant;

/// Pointer hint for the cell under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affordance {
    #[default]
    Default,
    Pointer,
    NotAllowed,
}

/// Where the canvas is displayed, in screen units. The displayed size may differ from the
/// logical 1000x1000 resolution on either axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn contains(&self, screen_x: f32, screen_y: f32) -> bool {
        screen_x >= self.x
            && screen_y >= self.y
            && screen_x < self.x + self.width
            && screen_y < self.y + self.height
    }

    pub fn to_logical(&self, screen_x: f32, screen_y: f32) -> Point {
        let sx = CANVAS_SIZE / self.width.max(f32::EPSILON);
        let sy = CANVAS_SIZE / self.height.max(f32::EPSILON);
        Point::new((screen_x - self.x) * sx, (screen_y - self.y) * sy)
    }
}

fn affordance_for(state: &LotteryState, index: usize) -> Affordance {
    if state.selection().is_selectable(index) {
        Affordance::Pointer
    } else {
        Affordance::NotAllowed
    }
}

/// Update hover for the cell under `point`.
pub fn pointer_move(state: &mut LotteryState, point: Point) -> Affordance {
    match hit_test(point) {
        Some(index) => {
            state.set_hover(Some(index));
            affordance_for(state, index)
        }
        None => {
            state.set_hover(None);
            Affordance::Default
        }
    }
}

pub fn pointer_leave(state: &mut LotteryState) -> Affordance {
    state.set_hover(None);
    Affordance::Default
}

/// Toggle the cell under `point`. None when the click misses every ball.
pub fn click(
    state: &mut LotteryState,
    point: Point,
    now: Instant,
) -> Option<Result<Toggle, SelectionError>> {
    if !in_grid_band(point.y) {
        return None;
    }
    let index = hit_test(point)?;
    Some(state.toggle_number(index, now))
}

/// Affordance for whatever is hovered right now (after state changes under a still pointer).
pub fn current_affordance(state: &LotteryState) -> Affordance {
    state
        .hover()
        .map_or(Affordance::Default, |index| affordance_for(state, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LotteryConfig;
    use crate::geometry::cell_center;
    use chrono::{Local, NaiveDate, TimeZone};

    fn state() -> LotteryState {
        let naive = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let wall = Local.from_local_datetime(&naive).unwrap();
        LotteryState::new(
            LotteryConfig {
                seed: Some(11),
                ..LotteryConfig::default()
            },
            wall,
        )
    }

    #[test]
    fn test_viewport_scales_to_logical() {
        let vp = Viewport {
            x: 10.0,
            y: 4.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(vp.to_logical(10.0, 4.0), Point::new(0.0, 0.0));
        assert_eq!(vp.to_logical(60.0, 29.0), Point::new(500.0, 500.0));
        assert!(vp.contains(109.0, 53.0));
        assert!(!vp.contains(110.0, 20.0));
    }

    #[test]
    fn test_move_sets_and_clears_hover() {
        let mut s = state();
        let c = cell_center(8).unwrap();
        assert_eq!(pointer_move(&mut s, c), Affordance::Pointer);
        assert_eq!(s.hover(), Some(8));
        assert_eq!(pointer_move(&mut s, Point::new(230.0, 190.0)), Affordance::Default);
        assert_eq!(s.hover(), None);
        pointer_move(&mut s, c);
        assert_eq!(pointer_leave(&mut s), Affordance::Default);
        assert_eq!(s.hover(), None);
    }

    #[test]
    fn test_not_allowed_at_cap() {
        let mut s = state();
        s.quick_select(10);
        let free = (0..20).find(|&i| !s.selection().is_selected(i)).unwrap();
        let picked = (0..20).find(|&i| s.selection().is_selected(i)).unwrap();
        assert_eq!(pointer_move(&mut s, cell_center(free).unwrap()), Affordance::NotAllowed);
        assert_eq!(pointer_move(&mut s, cell_center(picked).unwrap()), Affordance::Pointer);
    }

    #[test]
    fn test_click_toggles_hit_cell() {
        let mut s = state();
        let now = Instant::now();
        let c = cell_center(12).unwrap().offset(30.0, -20.0);
        assert_eq!(click(&mut s, c, now), Some(Ok(Toggle::Added(13))));
        assert_eq!(click(&mut s, c, now), Some(Ok(Toggle::Removed(13))));
        assert_eq!(click(&mut s, Point::new(500.0, 900.0), now), None);
        assert_eq!(click(&mut s, Point::new(-40.0, 100.0), now), None);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_click_when_full_reports_selection_full() {
        let mut s = state();
        let now = Instant::now();
        s.quick_select(10);
        let free = (0..20).find(|&i| !s.selection().is_selected(i)).unwrap();
        assert_eq!(
            click(&mut s, cell_center(free).unwrap(), now),
            Some(Err(SelectionError::SelectionFull))
        );
        assert_eq!(s.selection().len(), 10);
    }

    #[test]
    fn test_affordance_follows_state_under_still_pointer() {
        let mut s = state();
        let now = Instant::now();
        pointer_move(&mut s, cell_center(0).unwrap());
        assert_eq!(current_affordance(&s), Affordance::Pointer);
        for i in 1..=10 {
            s.toggle_number(i, now).unwrap();
        }
        assert_eq!(current_affordance(&s), Affordance::NotAllowed);
    }
}
