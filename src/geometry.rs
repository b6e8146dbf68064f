//! Grid geometry: logical canvas layout for the 20 balls and the selection tray.
//!
//! Drawing and hit-testing both read the constants below, so a ball is clickable
//! exactly where it is painted.

/// Logical canvas is CANVAS_SIZE x CANVAS_SIZE units regardless of terminal size.
pub const CANVAS_SIZE: f32 = 1000.0;

pub const GRID_COLS: usize = 5;
pub const GRID_ROWS: usize = 4;
/// Number of selectable cells (values 1..=CELL_COUNT).
pub const CELL_COUNT: usize = GRID_COLS * GRID_ROWS;

pub const BALL_RADIUS: f32 = 80.0;
const GRID_SPACING_X: f32 = 180.0;
const GRID_SPACING_Y: f32 = 180.0;
/// Center of cell 0.
const GRID_ORIGIN_X: f32 = 140.0;
const GRID_ORIGIN_Y: f32 = 100.0;

/// Clicks outside this vertical band never reach the grid (the tray lives below it).
const GRID_BAND_TOP: f32 = 20.0;
const GRID_BAND_BOTTOM: f32 = 820.0;

/// Tray: rounded backdrop below the grid listing picked numbers in order.
pub const TRAY_RECT: LogicalRect = LogicalRect {
    x: 50.0,
    y: 750.0,
    width: 900.0,
    height: 220.0,
};
pub const TRAY_CORNER_RADIUS: f32 = 30.0;
pub const TRAY_BALL_RADIUS: f32 = 40.0;
const TRAY_SPACING: f32 = 90.0;
const TRAY_BALL_Y: f32 = 860.0;
pub const TRAY_TITLE_ANCHOR: Point = Point::new(500.0, 790.0);
pub const TRAY_COUNTER_ANCHOR: Point = Point::new(500.0, 950.0);

/// A point in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LogicalRect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Center of the ball at `index` (row-major, 5 per row). None past the last cell.
pub fn cell_center(index: usize) -> Option<Point> {
    if index >= CELL_COUNT {
        return None;
    }
    let row = index / GRID_COLS;
    let col = index % GRID_COLS;
    Some(Point::new(
        GRID_ORIGIN_X + col as f32 * GRID_SPACING_X,
        GRID_ORIGIN_Y + row as f32 * GRID_SPACING_Y,
    ))
}

/// Index of the ball whose disc contains `point` (boundary inclusive).
pub fn hit_test(point: Point) -> Option<usize> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    (0..CELL_COUNT).find(|&i| {
        cell_center(i).is_some_and(|center| center.distance(point) <= BALL_RADIUS)
    })
}

/// True when `y` lies in the band where clicks are routed to the grid.
pub fn in_grid_band(y: f32) -> bool {
    (GRID_BAND_TOP..=GRID_BAND_BOTTOM).contains(&y)
}

/// Center of tray ball `slot` when `count` balls are shown; the row is centered as a group.
pub fn tray_ball_center(slot: usize, count: usize) -> Point {
    let half = TRAY_SPACING / 2.0;
    let start = CANVAS_SIZE / 2.0 - count as f32 * half + half;
    Point::new(start + slot as f32 * TRAY_SPACING, TRAY_BALL_Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_center_hits_its_own_cell() {
        for i in 0..CELL_COUNT {
            let c = cell_center(i).unwrap();
            assert_eq!(hit_test(c), Some(i), "cell {i}");
        }
    }

    #[test]
    fn test_cell_center_layout() {
        assert_eq!(cell_center(0), Some(Point::new(140.0, 100.0)));
        assert_eq!(cell_center(4), Some(Point::new(860.0, 100.0)));
        assert_eq!(cell_center(5), Some(Point::new(140.0, 280.0)));
        assert_eq!(cell_center(19), Some(Point::new(860.0, 640.0)));
        assert_eq!(cell_center(20), None);
    }

    #[test]
    fn test_hit_radius_is_inclusive() {
        let c = cell_center(7).unwrap();
        assert_eq!(hit_test(c.offset(BALL_RADIUS, 0.0)), Some(7));
        assert_eq!(hit_test(c.offset(0.0, -BALL_RADIUS)), Some(7));
        assert_eq!(hit_test(c.offset(BALL_RADIUS + 0.5, 0.0)), None);
    }

    #[test]
    fn test_gaps_and_outside_miss() {
        // Midway between cell 0 and cell 1 is 90 units from both centers.
        assert_eq!(hit_test(Point::new(230.0, 100.0)), None);
        assert_eq!(hit_test(Point::new(-50.0, -50.0)), None);
        assert_eq!(hit_test(Point::new(5000.0, 100.0)), None);
        assert_eq!(hit_test(Point::new(f32::NAN, 100.0)), None);
    }

    #[test]
    fn test_grid_band() {
        assert!(in_grid_band(20.0));
        assert!(in_grid_band(820.0));
        assert!(!in_grid_band(19.9));
        assert!(!in_grid_band(860.0));
    }

    #[test]
    fn test_tray_row_is_centered() {
        for count in 1..=10 {
            let first = tray_ball_center(0, count);
            let last = tray_ball_center(count - 1, count);
            let mid = (first.x + last.x) / 2.0;
            assert!((mid - CANVAS_SIZE / 2.0).abs() < 1e-3, "count {count}");
        }
        assert_eq!(tray_ball_center(0, 1), Point::new(500.0, 860.0));
    }

    #[test]
    fn test_tray_fits_inside_backdrop() {
        let first = tray_ball_center(0, 10);
        let last = tray_ball_center(9, 10);
        assert!(first.x - TRAY_BALL_RADIUS >= TRAY_RECT.x);
        assert!(last.x + TRAY_BALL_RADIUS <= TRAY_RECT.x + TRAY_RECT.width);
    }
}
