//! Render engine: draws the ball grid and the selection tray from the current state.
//! Every call repaints the whole canvas; nothing here mutates state.

use crate::game::LotteryState;
use crate::geometry::{
    BALL_RADIUS, Point, TRAY_BALL_RADIUS, TRAY_CORNER_RADIUS, TRAY_COUNTER_ANCHOR,
    TRAY_RECT, TRAY_TITLE_ANCHOR, cell_center, tray_ball_center,
};
use crate::selection::SELECTION_CAP;
use crate::surface::{GradientStop, Paint, RadialGradient, Rgba, Surface, TextStyle};
use crate::theme::{BallGradient, Theme};
use std::f32::consts::TAU;

/// Offset of the gradient focus (light source) from the ball center, as a fraction of the radius.
const LIGHT_OFFSET: f32 = 0.375;
/// Offset and size of the specular highlight, as fractions of the radius.
const HIGHLIGHT_OFFSET: f32 = 0.3125;
const HIGHLIGHT_RADIUS: f32 = 0.4375;
const HIGHLIGHT_RADIUS_HOVERED: f32 = 0.5625;
/// Drop shadow offset for resting balls.
const SHADOW_OFFSET: f32 = 8.0;
const RING_WIDTH: f32 = 6.0;
const CROSS_HALF: f32 = 25.0;

/// Visual state of one grid cell, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLook {
    Selected,
    Hovered,
    Idle,
    /// Cap reached and not picked: dimmed and crossed out. Hover is ignored.
    Disabled,
}

pub fn cell_look(state: &LotteryState, index: usize) -> CellLook {
    let selection = state.selection();
    if selection.is_selected(index) {
        CellLook::Selected
    } else if !selection.is_selectable(index) {
        CellLook::Disabled
    } else if state.hover() == Some(index) {
        CellLook::Hovered
    } else {
        CellLook::Idle
    }
}

fn ball_paint(center: Point, radius: f32, colors: &BallGradient) -> Paint {
    let [start, mid, end] = colors.map(Rgba::from_color);
    Paint::Radial(RadialGradient {
        focus: center.offset(-radius * LIGHT_OFFSET, -radius * LIGHT_OFFSET),
        inner_radius: radius * 0.1875,
        center,
        outer_radius: radius,
        stops: vec![
            GradientStop::new(0.0, start),
            GradientStop::new(0.7, mid),
            GradientStop::new(1.0, end),
        ],
    })
}

fn highlight_paint(center: Point, radius: f32, strength: f32) -> Paint {
    Paint::Radial(RadialGradient::concentric(
        center,
        0.0,
        radius,
        vec![
            GradientStop::new(0.0, Rgba::WHITE.with_alpha(strength)),
            GradientStop::new(1.0, Rgba::WHITE.with_alpha(0.0)),
        ],
    ))
}

fn numeral_style() -> TextStyle {
    TextStyle {
        color: Rgba::BLACK,
        shadow: Some(Rgba::WHITE),
        bold: true,
    }
}

/// Repaint the whole canvas. `pulse` is the confirmation animation phase (0.0..1.0) while
/// a purchase is being confirmed.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    state: &LotteryState,
    theme: &Theme,
    pulse: Option<f32>,
) {
    surface.clear(Rgba::from_color(theme.canvas_bg));
    draw_grid(surface, state, theme);
    draw_tray(surface, state, theme, pulse);
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, state: &LotteryState, theme: &Theme) {
    let ring = Rgba::from_color(theme.ring);
    for (index, cell) in state.selection().cells().iter().enumerate() {
        let Some(center) = cell_center(index) else {
            continue;
        };
        let look = cell_look(state, index);
        let hovered = state.hover() == Some(index);

        // Shadow or glow underneath.
        if look == CellLook::Hovered {
            let glow = Paint::Radial(RadialGradient::concentric(
                center,
                BALL_RADIUS,
                BALL_RADIUS + 28.0,
                vec![
                    GradientStop::new(0.0, Rgba::rgb(124, 138, 255).with_alpha(0.6)),
                    GradientStop::new(1.0, Rgba::rgb(124, 138, 255).with_alpha(0.0)),
                ],
            ));
            surface.fill_circle(center, BALL_RADIUS + 28.0, &glow);
        } else {
            let shadow = center.offset(SHADOW_OFFSET, SHADOW_OFFSET);
            surface.fill_circle(shadow, BALL_RADIUS, &Paint::Solid(Rgba::BLACK.with_alpha(0.26)));
        }

        let colors = match look {
            CellLook::Selected => &theme.ball_selected,
            CellLook::Hovered => &theme.ball_hover,
            CellLook::Idle | CellLook::Disabled => &theme.ball_idle,
        };
        surface.fill_circle(center, BALL_RADIUS, &ball_paint(center, BALL_RADIUS, colors));

        let (highlight_radius, strength) = if hovered {
            (BALL_RADIUS * HIGHLIGHT_RADIUS_HOVERED, 0.6)
        } else {
            (BALL_RADIUS * HIGHLIGHT_RADIUS, 0.4)
        };
        let spot = center.offset(
            -BALL_RADIUS * HIGHLIGHT_OFFSET,
            -BALL_RADIUS * HIGHLIGHT_OFFSET,
        );
        surface.fill_circle(spot, highlight_radius, &highlight_paint(spot, highlight_radius, strength));

        match look {
            CellLook::Hovered => surface.stroke_circle(center, BALL_RADIUS + 8.0, RING_WIDTH, ring),
            CellLook::Selected => surface.stroke_circle(center, BALL_RADIUS + 4.0, RING_WIDTH, ring),
            CellLook::Disabled => {
                surface.fill_circle(center, BALL_RADIUS, &Paint::Solid(Rgba::BLACK.with_alpha(0.5)));
                let cross = Rgba::WHITE.with_alpha(0.7);
                surface.stroke_line(
                    center.offset(-CROSS_HALF, -CROSS_HALF),
                    center.offset(CROSS_HALF, CROSS_HALF),
                    RING_WIDTH,
                    cross,
                );
                surface.stroke_line(
                    center.offset(CROSS_HALF, -CROSS_HALF),
                    center.offset(-CROSS_HALF, CROSS_HALF),
                    RING_WIDTH,
                    cross,
                );
            }
            CellLook::Idle => {}
        }
        if !hovered && look != CellLook::Selected {
            surface.stroke_circle(center, BALL_RADIUS + 2.0, 4.0, Rgba::WHITE.with_alpha(0.2));
        }

        surface.fill_text(&cell.value.to_string(), center, numeral_style());
    }
}

fn draw_tray<S: Surface + ?Sized>(
    surface: &mut S,
    state: &LotteryState,
    theme: &Theme,
    pulse: Option<f32>,
) {
    surface.fill_rounded_rect(
        TRAY_RECT,
        TRAY_CORNER_RADIUS,
        Rgba::from_color(theme.tray).with_alpha(0.19),
    );
    surface.fill_text(
        "SELECTED NUMBERS",
        TRAY_TITLE_ANCHOR,
        TextStyle {
            color: Rgba::from_color(theme.title),
            shadow: Some(Rgba::BLACK.with_alpha(0.5)),
            bold: true,
        },
    );

    let picked = state.selection().picked();
    let swell = pulse.map(|phase| (phase * TAU).sin() * 0.5 + 0.5);
    for (slot, value) in picked.iter().enumerate() {
        let center = tray_ball_center(slot, picked.len());
        surface.fill_circle(
            center.offset(5.0, 5.0),
            TRAY_BALL_RADIUS,
            &Paint::Solid(Rgba::BLACK.with_alpha(0.3)),
        );
        surface.fill_circle(
            center,
            TRAY_BALL_RADIUS,
            &ball_paint(center, TRAY_BALL_RADIUS, &theme.ball_tray),
        );
        let spot = center.offset(-12.0, -12.0);
        surface.fill_circle(spot, 20.0, &highlight_paint(spot, 20.0, 0.4));
        surface.fill_text(&value.to_string(), center, numeral_style());

        if let Some(swell) = swell {
            surface.stroke_circle(
                center,
                TRAY_BALL_RADIUS + 6.0 + 4.0 * swell,
                4.0,
                Rgba::WHITE.with_alpha(0.3 + 0.4 * swell),
            );
        }
    }

    surface.fill_text(
        &format!("SELECTED: {}/{}", picked.len(), SELECTION_CAP),
        TRAY_COUNTER_ANCHOR,
        TextStyle {
            color: Rgba::from_color(theme.counter),
            shadow: None,
            bold: true,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LotteryConfig;
    use crate::geometry::CELL_COUNT;
    use crate::surface::Raster;
    use chrono::{Local, NaiveDate, TimeZone};
    use std::time::Instant;

    fn state() -> LotteryState {
        let naive = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let wall = Local.from_local_datetime(&naive).unwrap();
        LotteryState::new(
            LotteryConfig {
                seed: Some(5),
                ..LotteryConfig::default()
            },
            wall,
        )
    }

    fn draw(state: &LotteryState, pulse: Option<f32>) -> Raster {
        let mut raster = Raster::new(1000, 1000);
        render(&mut raster, state, &Theme::default(), pulse);
        raster
    }

    fn at(raster: &Raster, p: Point) -> Rgba {
        raster.pixel_at(p).unwrap()
    }

    #[test]
    fn test_idle_is_blue_selected_is_gold() {
        let mut s = state();
        s.toggle_number(0, Instant::now()).unwrap();
        let raster = draw(&s, None);
        let picked = at(&raster, cell_center(0).unwrap());
        let idle = at(&raster, cell_center(1).unwrap());
        assert!(picked.r > picked.b, "{picked:?}");
        assert!(idle.b > idle.r, "{idle:?}");
    }

    #[test]
    fn test_hover_turns_selectable_ball_gold() {
        let mut s = state();
        s.set_hover(Some(6));
        let raster = draw(&s, None);
        let hovered = at(&raster, cell_center(6).unwrap());
        assert!(hovered.r > hovered.b, "{hovered:?}");
        assert_eq!(cell_look(&s, 6), CellLook::Hovered);
    }

    #[test]
    fn test_disabled_overrides_hover_and_darkens() {
        let mut s = state();
        let before = draw(&s, None);
        s.quick_select(10);
        let free = (0..CELL_COUNT).find(|&i| !s.selection().is_selected(i)).unwrap();
        s.set_hover(Some(free));
        assert_eq!(cell_look(&s, free), CellLook::Disabled);
        let after = draw(&s, None);
        let probe = cell_center(free).unwrap().offset(0.0, 50.0);
        let lit = at(&before, probe).luminance();
        let dim = at(&after, probe).luminance();
        assert!(dim < lit * 0.7, "lit {lit} dim {dim}");
        assert!(at(&after, probe).b >= at(&after, probe).r);
    }

    #[test]
    fn test_labels_cover_grid_title_and_counter() {
        let s = state();
        let raster = draw(&s, None);
        let labels = raster.labels();
        assert_eq!(labels.len(), CELL_COUNT + 2);
        for value in 1..=20 {
            assert!(labels.iter().any(|l| l.text == value.to_string()));
        }
        assert!(labels.iter().any(|l| l.text == "SELECTED NUMBERS"));
        assert!(labels.iter().any(|l| l.text == "SELECTED: 0/10"));
    }

    #[test]
    fn test_numerals_bold_with_or_without_hover() {
        let mut s = state();
        s.set_hover(Some(2));
        let raster = draw(&s, None);
        let numerals: Vec<_> = raster
            .labels()
            .iter()
            .filter(|l| l.text.parse::<u8>().is_ok())
            .collect();
        assert_eq!(numerals.len(), CELL_COUNT);
        assert!(numerals.iter().all(|l| l.style.bold));
    }

    #[test]
    fn test_tray_lists_picks_in_order() {
        let mut s = state();
        let now = Instant::now();
        for index in [14, 2, 9] {
            s.toggle_number(index, now).unwrap();
        }
        let raster = draw(&s, None);
        let tray: Vec<_> = raster
            .labels()
            .iter()
            .filter(|l| l.anchor.y == tray_ball_center(0, 3).y)
            .collect();
        let texts: Vec<&str> = tray.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["15", "3", "10"]);
        assert!(tray.windows(2).all(|w| w[0].anchor.x < w[1].anchor.x));
        assert!(raster.labels().iter().any(|l| l.text == "SELECTED: 3/10"));
        let ball = at(&raster, tray_ball_center(1, 3));
        assert!(ball.r > ball.b);
    }

    #[test]
    fn test_pulse_draws_ring_around_tray_balls() {
        let mut s = state();
        s.toggle_number(0, Instant::now()).unwrap();
        let still = draw(&s, None);
        let pulsing = draw(&s, Some(0.25));
        let ring = tray_ball_center(0, 1).offset(TRAY_BALL_RADIUS + 10.0, 0.0);
        assert_ne!(at(&still, ring), at(&pulsing, ring));
        assert!(at(&pulsing, ring).luminance() > at(&still, ring).luminance());
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut s = state();
        s.quick_select(4);
        let a = draw(&s, None);
        let b = draw(&s, None);
        assert_eq!(a.labels(), b.labels());
        let p = cell_center(12).unwrap();
        assert_eq!(at(&a, p), at(&b, p));
    }
}
