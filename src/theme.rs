//! Theme loading: btop-style `theme[key]="value"` files and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Three-stop ball gradient: highlight (0.0), body (0.7), rim (1.0).
pub type BallGradient = [Color; 3];

/// Colours for the chrome and the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Terminal background behind the chrome.
    pub bg: Color,
    /// Canvas background (behind the balls).
    pub canvas_bg: Color,
    /// Borders.
    pub div_line: Color,
    /// Regular text.
    pub main_fg: Color,
    /// Titles, the credit balance, gold accents.
    pub title: Color,
    /// Disabled buttons and hints.
    pub inactive_fg: Color,
    pub ball_idle: BallGradient,
    pub ball_hover: BallGradient,
    pub ball_selected: BallGradient,
    /// Tray balls.
    pub ball_tray: BallGradient,
    /// Ring around selected and hovered balls.
    pub ring: Color,
    /// Tray backdrop tint (drawn translucent).
    pub tray: Color,
    /// "SELECTED: k/10" counter.
    pub counter: Color,
    pub warning: Color,
    pub success: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::jackpot_default()
    }
}

/// Parse a literal known to be valid; only used for the built-in palettes.
fn hex(s: &str) -> Color {
    parse_hex(s).unwrap_or(Color::Reset)
}

impl Theme {
    /// Built-in palette: cyan/blue balls that turn gold when hovered or picked.
    pub fn jackpot_default() -> Self {
        Self {
            bg: hex("#0B1026"),
            canvas_bg: hex("#101A3A"),
            div_line: hex("#3F4A7A"),
            main_fg: hex("#D7DCF0"),
            title: hex("#FFD700"),
            inactive_fg: hex("#5C6370"),
            ball_idle: [hex("#00FFFF"), hex("#0099FF"), hex("#0066FF")],
            ball_hover: [hex("#FFD700"), hex("#FFB347"), hex("#FF8C00")],
            ball_selected: [hex("#FFED4E"), hex("#FFD700"), hex("#FF8C00")],
            ball_tray: [hex("#FFD700"), hex("#FFB347"), hex("#FF8C00")],
            ring: hex("#FFD700"),
            tray: hex("#346FFF"),
            counter: hex("#00C6FF"),
            warning: hex("#E06C75"),
            success: hex("#98C379"),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the built-in palette if path is None or missing; unknown or
    /// malformed keys keep their defaults.
    /// `palette` selects colour variant: Normal (theme), HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::jackpot_default();
        t.apply_palette(palette);
        t
    }

    /// Override ball colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.ball_idle = [hex("#FFFFFF"), hex("#00AAFF"), hex("#0033CC")];
                self.ball_hover = [hex("#FFFF66"), hex("#FFFF00"), hex("#FFAA00")];
                self.ball_selected = [hex("#FFFF00"), hex("#FF8800"), hex("#CC4400")];
                self.ring = hex("#FFFFFF");
                self.canvas_bg = hex("#000000");
                self.counter = hex("#00FFFF");
            }
            crate::Palette::Colorblind => {
                // Blue vs orange stays distinct for the common red/green deficiencies.
                self.ball_idle = [hex("#88CCEE"), hex("#0077BB"), hex("#004488")];
                self.ball_hover = [hex("#FFCC99"), hex("#EE7733"), hex("#BB5500")];
                self.ball_selected = [hex("#FFEE88"), hex("#EE7733"), hex("#CC3311")];
                self.ball_tray = self.ball_selected;
                self.ring = hex("#EE7733");
                self.warning = hex("#EE3377");
                self.success = hex("#009988");
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let d = Self::jackpot_default();
        let get = |key: &str, fallback: Color| {
            map.get(key)
                .and_then(|v| parse_hex(v).ok())
                .unwrap_or(fallback)
        };
        let gradient = |key: &str, fallback: BallGradient| {
            map.get(key)
                .and_then(|v| parse_gradient(v).ok())
                .unwrap_or(fallback)
        };
        Self {
            bg: get("main_bg", d.bg),
            canvas_bg: get("canvas_bg", d.canvas_bg),
            div_line: get("div_line", d.div_line),
            main_fg: get("main_fg", d.main_fg),
            title: get("title", d.title),
            inactive_fg: get("inactive_fg", d.inactive_fg),
            ball_idle: gradient("ball_idle", d.ball_idle),
            ball_hover: gradient("ball_hover", d.ball_hover),
            ball_selected: gradient("ball_selected", d.ball_selected),
            ball_tray: gradient("ball_tray", d.ball_tray),
            ring: get("ring", d.ring),
            tray: get("tray", d.tray),
            counter: get("counter", d.counter),
            warning: get("warning", d.warning),
            success: get("success", d.success),
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'').trim();
        if !value.is_empty() {
            map.insert(key.to_string(), value.to_string());
        }
    }
    map
}

/// Three whitespace-separated hex colours, e.g. `#00FFFF #0099FF #0066FF`.
fn parse_gradient(s: &str) -> Result<BallGradient, ThemeError> {
    let colors = s
        .split_whitespace()
        .map(parse_hex)
        .collect::<Result<Vec<_>, _>>()?;
    <[Color; 3]>::try_from(colors).map_err(|_| ThemeError::InvalidHex(s.to_string()))
}

/// Parse hex colour "#RRGGBB", "#RRGGBBAA" (alpha ignored) or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.trim().to_string());
    if !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>, repeat: bool| -> Result<u8, ThemeError> {
        let v = u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())?;
        Ok(if repeat { v * 17 } else { v })
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2, false)?, channel(2..4, false)?, channel(4..6, false)?)),
        8 => {
            channel(6..8, false)?;
            Ok(Color::Rgb(channel(0..2, false)?, channel(2..4, false)?, channel(4..6, false)?))
        }
        3 => Ok(Color::Rgb(channel(0..1, true)?, channel(1..2, true)?, channel(2..3, true)?)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#FFD700").unwrap();
        assert!(matches!(c, Color::Rgb(0xFF, 0xD7, 0x00)));
    }

    #[test]
    fn test_parse_hex_8_drops_alpha() {
        let c = parse_hex("#00C6FF80").unwrap();
        assert!(matches!(c, Color::Rgb(0x00, 0xC6, 0xFF)));
        assert!(parse_hex("#00C6F").is_err());
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#0F0").unwrap();
        assert!(matches!(c, Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
        assert!(parse_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[canvas_bg]="#101A3A""##);
        assert_eq!(map.get("canvas_bg"), Some(&"#101A3A".to_string()));
    }

    #[test]
    fn test_theme_file_overrides_only_given_keys() {
        let map = parse_theme_file(
            "# comment\n\
             theme[ring]='#FFFFFF'\n\
             theme[ball_idle]=\"#111 #222 #333\"\n\
             theme[counter]=\"nonsense\"\n",
        );
        let theme = Theme::from_map(&map);
        let d = Theme::jackpot_default();
        assert_eq!(theme.ring, Color::Rgb(255, 255, 255));
        assert_eq!(theme.ball_idle[1], Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(theme.counter, d.counter);
        assert_eq!(theme.title, d.title);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let theme = Theme::load(
            Some(Path::new("/definitely/not/here.theme")),
            crate::Palette::Normal,
        )
        .unwrap();
        assert_eq!(theme, Theme::jackpot_default());
    }

    #[test]
    fn test_palettes_change_ball_colours() {
        let mut t = Theme::jackpot_default();
        t.apply_palette(crate::Palette::Colorblind);
        assert_ne!(t.ball_idle, Theme::jackpot_default().ball_idle);
    }
}
