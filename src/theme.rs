//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Candy palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Candy colours (index 0..=5): red, green, blue, yellow, orange, purple.
    pub candy: [Color; 6],
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, moves).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text; also the hint highlight.
    pub inactive_fg: Color,
    /// Background of the selected cell.
    pub selected_bg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Hex literal known to be valid at compile time.
fn hex(s: &str) -> Color {
    parse_hex(s).unwrap_or(Color::Reset)
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// One Dark defaults.
    pub fn onedark_default() -> Self {
        Self {
            candy: [
                hex("#E06C75"), // red
                hex("#98C379"), // green
                hex("#61AFEF"), // blue
                hex("#E5C07B"), // yellow
                hex("#D19A66"), // orange
                hex("#C678DD"), // purple
            ],
            bg: hex("#282C34"),
            div_line: hex("#3F444F"),
            main_fg: hex("#ABB2BF"),
            title: hex("#E5C07B"),
            inactive_fg: hex("#5C6370"),
            selected_bg: hex("#4B5263"),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    /// `palette` then overrides the candy colours for high-contrast or colorblind play.
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
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.candy = [
                    hex("#FF0000"),
                    hex("#00FF00"),
                    hex("#0088FF"),
                    hex("#FFFF00"),
                    hex("#FF8800"),
                    hex("#FF00FF"),
                ];
            }
            crate::Palette::Colorblind => {
                // Tol's bright scheme: distinguishable without red/green contrast
                self.candy = [
                    hex("#EE6677"),
                    hex("#228833"),
                    hex("#4477AA"),
                    hex("#CCBB44"),
                    hex("#66CCEE"),
                    hex("#AA3377"),
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let d = Self::onedark_default();
        Self {
            candy: [
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.candy[0]),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.candy[1]),
                get("cpu_box").unwrap_or(d.candy[2]),
                get("cpu_mid").or_else(|| get("title")).unwrap_or(d.candy[3]),
                get("temp_mid").or_else(|| get("download_mid")).unwrap_or(d.candy[4]),
                get("net_box").unwrap_or(d.candy[5]),
            ],
            bg: get("main_bg").or_else(|| get("meter_bg")).unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
            selected_bg: get("selected_bg").unwrap_or(d.selected_bg),
        }
    }

    /// Candy colour for a colour class.
    #[inline]
    pub fn candy_color(&self, index: u8) -> Color {
        self.candy[(index as usize) % self.candy.len()]
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
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("#GGGGGG"), Err(ThemeError::InvalidHex(_))));
        // six bytes, but 'é' straddles a channel boundary
        assert!(matches!(parse_hex("#aéaaa"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("é"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_theme_file_overrides_candy() {
        let map = parse_theme_file("theme[cpu_end]=\"#FF0000\"\n# comment\ntheme[net_box]='#00F'");
        let theme = Theme::from_map(&map);
        assert_eq!(theme.candy_color(0), Color::Rgb(255, 0, 0));
        assert_eq!(theme.candy_color(5), Color::Rgb(0, 0, 255));
        assert_eq!(theme.candy_color(2), Theme::onedark_default().candy[2]);
    }

    #[test]
    fn test_palette_keeps_ui_colours() {
        let mut t = Theme::onedark_default();
        let bg = t.bg;
        t.apply_palette(crate::Palette::HighContrast);
        assert_eq!(t.bg, bg);
        assert_eq!(t.candy_color(0), Color::Rgb(255, 0, 0));
    }
}
