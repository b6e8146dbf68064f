//! Drawable surface: the primitive calls the render engine makes, and a software raster
//! that implements them. The raster is what the terminal canvas blits.

use crate::geometry::{CANVAS_SIZE, LogicalRect, Point};
use ratatui::style::Color;

/// 8-bit RGBA colour; `a` is coverage (255 = opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same colour with alpha given as a 0.0..=1.0 fraction.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Convert a theme colour. Named ANSI colours map to their usual RGB values.
    pub fn from_color(color: Color) -> Self {
        let (r, g, b) = match color {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Black => (0, 0, 0),
            Color::Red => (205, 0, 0),
            Color::Green => (0, 205, 0),
            Color::Yellow => (205, 205, 0),
            Color::Blue => (0, 0, 238),
            Color::Magenta => (205, 0, 205),
            Color::Cyan => (0, 205, 205),
            Color::Gray => (192, 192, 192),
            Color::DarkGray => (128, 128, 128),
            Color::LightRed => (255, 0, 0),
            Color::LightGreen => (0, 255, 0),
            Color::LightYellow => (255, 255, 0),
            Color::LightBlue => (92, 92, 255),
            Color::LightMagenta => (255, 0, 255),
            Color::LightCyan => (0, 255, 255),
            Color::White => (255, 255, 255),
            _ => (128, 128, 128),
        };
        Self::rgb(r, g, b)
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Linear interpolation of every channel, `t` in 0.0..=1.0.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Source-over composite of `src` scaled by `coverage` onto this (opaque) colour.
    fn blend(self, src: Self, coverage: f32) -> Self {
        let alpha = (src.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return self;
        }
        let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * alpha).round() as u8;
        Self::rgb(mix(self.r, src.r), mix(self.g, src.g), mix(self.b, src.b))
    }

    /// Relative luminance in 0.0..=1.0 (Rec. 709 weights, no gamma).
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Two-circle radial gradient: t = 0 on the focus circle (`focus`, `inner_radius`),
/// t = 1 on the outer circle (`center`, `outer_radius`), interpolated circles in between.
/// Points beyond either end take the nearest end stop.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub focus: Point,
    pub inner_radius: f32,
    pub center: Point,
    pub outer_radius: f32,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Gradient centred on one point.
    pub fn concentric(
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        stops: Vec<GradientStop>,
    ) -> Self {
        Self {
            focus: center,
            inner_radius,
            center,
            outer_radius,
            stops,
        }
    }

    pub fn color_at(&self, p: Point) -> Rgba {
        match self.parameter_at(p) {
            Some(t) => sample_stops(&self.stops, t.clamp(0.0, 1.0)),
            None => Rgba::TRANSPARENT,
        }
    }

    /// Largest t whose circle passes through `p` with a non-negative radius.
    fn parameter_at(&self, p: Point) -> Option<f32> {
        let (cx, cy) = (self.center.x - self.focus.x, self.center.y - self.focus.y);
        let (px, py) = (p.x - self.focus.x, p.y - self.focus.y);
        let r0 = self.inner_radius;
        let dr = self.outer_radius - r0;
        let a = cx * cx + cy * cy - dr * dr;
        let b = px * cx + py * cy + r0 * dr;
        let c = px * px + py * py - r0 * r0;
        let radius_ok = |t: f32| r0 + t * dr >= 0.0;
        if a.abs() < f32::EPSILON {
            if b.abs() < f32::EPSILON {
                return None;
            }
            let t = c / (2.0 * b);
            return radius_ok(t).then_some(t);
        }
        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let (t1, t2) = ((b + root) / a, (b - root) / a);
        let (hi, lo) = (t1.max(t2), t1.min(t2));
        if radius_ok(hi) {
            Some(hi)
        } else if radius_ok(lo) {
            Some(lo)
        } else {
            None
        }
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops.last().map_or(first.color, |s| s.color)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    fn color_at(&self, p: Point) -> Rgba {
        match self {
            Self::Solid(c) => *c,
            Self::Radial(g) => g.color_at(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    /// Drawn behind the glyphs where they would otherwise be hard to read.
    pub shadow: Option<Rgba>,
    pub bold: bool,
}

/// Text positioned on the canvas, centered on `anchor`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub anchor: Point,
    pub style: TextStyle,
}

/// Primitive drawing calls in logical canvas coordinates (0..1000 on both axes).
pub trait Surface {
    fn clear(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);
    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba);
    fn fill_rounded_rect(&mut self, rect: LogicalRect, corner_radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);
    fn fill_text(&mut self, text: &str, anchor: Point, style: TextStyle);
}

/// Software surface: `width` x `height` opaque pixels. Logical units are scaled uniformly
/// so the 1000x1000 canvas fits the shorter side.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u16,
    height: u16,
    /// Pixels per logical unit.
    scale: f32,
    pixels: Vec<Rgba>,
    labels: Vec<TextLabel>,
}

impl Raster {
    pub fn new(width: u16, height: u16) -> Self {
        let side = width.min(height).max(1);
        Self {
            width,
            height,
            scale: side as f32 / CANVAS_SIZE,
            pixels: vec![Rgba::BLACK; width as usize * height as usize],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[cfg(test)]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Pixel under a logical point.
    #[cfg(test)]
    pub fn pixel_at(&self, p: Point) -> Option<Rgba> {
        let (x, y) = (p.x * self.scale, p.y * self.scale);
        if x < 0.0 || y < 0.0 {
            return None;
        }
        self.pixel(x as u16, y as u16)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Pixel coordinates of a logical point.
    pub fn to_pixel(&self, p: Point) -> (f32, f32) {
        (p.x * self.scale, p.y * self.scale)
    }

    /// Visit every pixel whose center lies in the logical box `[min, max]`, passing the
    /// logical position of the pixel center; the callback returns (colour, coverage).
    fn shade(&mut self, min: Point, max: Point, mut f: impl FnMut(Point) -> Option<(Rgba, f32)>) {
        let x0 = (min.x * self.scale).floor().max(0.0) as usize;
        let y0 = (min.y * self.scale).floor().max(0.0) as usize;
        let x1 = ((max.x * self.scale).ceil().max(0.0) as usize).min(self.width as usize);
        let y1 = ((max.y * self.scale).ceil().max(0.0) as usize).min(self.height as usize);
        for py in y0..y1 {
            for px in x0..x1 {
                let p = Point::new(
                    (px as f32 + 0.5) / self.scale,
                    (py as f32 + 0.5) / self.scale,
                );
                if let Some((color, coverage)) = f(p) {
                    let idx = py * self.width as usize + px;
                    self.pixels[idx] = self.pixels[idx].blend(color, coverage);
                }
            }
        }
    }
}

impl Surface for Raster {
    fn clear(&mut self, color: Rgba) {
        let opaque = Rgba { a: 255, ..color };
        self.pixels.fill(opaque);
        self.labels.clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        let reach = radius + 1.0 / self.scale;
        let scale = self.scale;
        self.shade(
            center.offset(-reach, -reach),
            center.offset(reach, reach),
            |p| {
                let inside = radius - p.distance(center);
                let coverage = (inside * scale + 0.5).clamp(0.0, 1.0);
                (coverage > 0.0).then(|| (paint.color_at(p), coverage))
            },
        );
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba) {
        let half = (width / 2.0).max(0.5 / self.scale);
        let reach = radius + half + 1.0 / self.scale;
        let scale = self.scale;
        self.shade(
            center.offset(-reach, -reach),
            center.offset(reach, reach),
            |p| {
                let inside = half - (p.distance(center) - radius).abs();
                let coverage = (inside * scale + 0.5).clamp(0.0, 1.0);
                (coverage > 0.0).then_some((color, coverage))
            },
        );
    }

    fn fill_rounded_rect(&mut self, rect: LogicalRect, corner_radius: f32, color: Rgba) {
        let r = corner_radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let c = rect.center();
        let (hw, hh) = (rect.width / 2.0 - r, rect.height / 2.0 - r);
        let scale = self.scale;
        self.shade(
            Point::new(rect.x, rect.y),
            Point::new(rect.x + rect.width, rect.y + rect.height),
            |p| {
                let dx = ((p.x - c.x).abs() - hw).max(0.0);
                let dy = ((p.y - c.y).abs() - hh).max(0.0);
                let inside = r - dx.hypot(dy);
                let coverage = (inside * scale + 0.5).clamp(0.0, 1.0);
                (coverage > 0.0).then_some((color, coverage))
            },
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        let half = (width / 2.0).max(0.5 / self.scale);
        let pad = half + 1.0 / self.scale;
        let min = Point::new(from.x.min(to.x) - pad, from.y.min(to.y) - pad);
        let max = Point::new(from.x.max(to.x) + pad, from.y.max(to.y) + pad);
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
        let scale = self.scale;
        self.shade(min, max, |p| {
            let t = (((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq).clamp(0.0, 1.0);
            let nearest = Point::new(from.x + t * dx, from.y + t * dy);
            let inside = half - p.distance(nearest);
            let coverage = (inside * scale + 0.5).clamp(0.0, 1.0);
            (coverage > 0.0).then_some((color, coverage))
        });
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: TextStyle) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            anchor,
            style,
        });
    }
}
