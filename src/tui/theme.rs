//! Theme variables and the depth chart palette.
//!
//! Colours are looked up by name from a flat JSON map of theme variables
//! (`{"--depth-color-buy-fill": "#1f6f4a", ...}`). Missing or unparsable
//! values fall back to the built-in palette for the active [`Theme`].

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use ratatui::style::Color;
use tracing::{debug, warn};

use crate::settings::Theme;
use crate::{DeskError, Result};

/// Opacity applied to area fills when both fill and background are RGB.
const FILL_ALPHA: f32 = 0.35;

/// Named theme variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeVars {
    vars: HashMap<String, String>,
}

impl ThemeVars {
    /// Loads variables from a JSON object of strings.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Io`] if the file cannot be read and
    /// [`DeskError::Json`] if it is not a string map.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeskError::Io(format!("{}: {e}", path.display())))?;
        let raw: HashMap<String, String> = serde_json::from_str(&text)?;
        debug!(path = %path.display(), count = raw.len(), "Loaded theme variables");
        Ok(raw.into_iter().collect())
    }

    /// Returns the value for `name`, with or without a leading `--`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name.trim_start_matches("--"))
            .map(String::as_str)
    }

    /// Parses `name` as a colour.
    pub fn color(&self, name: &str) -> Option<Color> {
        let value = self.get(name)?;
        match Color::from_str(value.trim()) {
            Ok(color) => Some(color),
            Err(_) => {
                warn!(name, value, "Unparsable theme colour");
                None
            }
        }
    }
}

impl FromIterator<(String, String)> for ThemeVars {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.trim_start_matches("--").to_string(), v))
                .collect(),
        }
    }
}

/// Colours used to draw the depth chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthPalette {
    pub buy_fill: Color,
    pub buy_stroke: Color,
    pub sell_fill: Color,
    pub sell_stroke: Color,
    pub font: Color,
    pub background: Color,
}

impl DepthPalette {
    /// Built-in colours for `theme`.
    pub fn fallback(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                buy_fill: Color::Rgb(22, 199, 132),
                buy_stroke: Color::Rgb(22, 199, 132),
                sell_fill: Color::Rgb(234, 57, 67),
                sell_stroke: Color::Rgb(234, 57, 67),
                font: Color::Rgb(200, 204, 214),
                background: Color::Rgb(18, 20, 28),
            },
            Theme::Light => Self {
                buy_fill: Color::Rgb(0, 150, 90),
                buy_stroke: Color::Rgb(0, 130, 80),
                sell_fill: Color::Rgb(210, 40, 50),
                sell_stroke: Color::Rgb(190, 30, 40),
                font: Color::Rgb(40, 44, 52),
                background: Color::Rgb(250, 250, 252),
            },
        }
    }

    /// Resolves the palette from theme variables at draw time.
    ///
    /// Fills are blended toward the background so the strokes stand out.
    pub fn resolve(vars: &ThemeVars, theme: Theme) -> Self {
        let base = Self::fallback(theme);
        let pick = |name: &str, default: Color| vars.color(name).unwrap_or(default);

        let background = pick("depth-color-background", base.background);
        Self {
            buy_fill: blend(
                pick("depth-color-buy-fill", base.buy_fill),
                background,
                FILL_ALPHA,
            ),
            buy_stroke: pick("depth-color-buy-stroke", base.buy_stroke),
            sell_fill: blend(
                pick("depth-color-sell-fill", base.sell_fill),
                background,
                FILL_ALPHA,
            ),
            sell_stroke: pick("depth-color-sell-stroke", base.sell_stroke),
            font: pick("depth-color-font", base.font),
            background,
        }
    }
}

/// Mixes `fg` over `bg` at `alpha`. Non-RGB colours are returned unchanged.
fn blend(fg: Color, bg: Color, alpha: f32) -> Color {
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |f: u8, b: u8| {
                let value = f32::from(f) * alpha + f32::from(b) * (1.0 - alpha);
                value.round().clamp(0.0, 255.0) as u8
            };
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ => fg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> ThemeVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn strips_leading_dashes() {
        let v = vars(&[("--depth-color-font", "#ffffff")]);
        assert_eq!(v.get("depth-color-font"), Some("#ffffff"));
        assert_eq!(v.get("--depth-color-font"), Some("#ffffff"));
        assert_eq!(v.color("depth-color-font"), Some(Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn missing_and_bad_values_fall_back() {
        let v = vars(&[("depth-color-buy-stroke", "not-a-colour")]);
        let palette = DepthPalette::resolve(&v, Theme::Dark);
        let base = DepthPalette::fallback(Theme::Dark);
        assert_eq!(palette.buy_stroke, base.buy_stroke);
        assert_eq!(palette.font, base.font);
    }

    #[test]
    fn fill_is_blended_toward_background() {
        let v = vars(&[
            ("depth-color-buy-fill", "#ff0000"),
            ("depth-color-background", "#000000"),
        ]);
        let palette = DepthPalette::resolve(&v, Theme::Light);
        assert_eq!(palette.buy_fill, Color::Rgb(89, 0, 0));
        assert_eq!(palette.background, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn named_colours_are_not_blended() {
        let v = vars(&[("depth-color-sell-fill", "red")]);
        let palette = DepthPalette::resolve(&v, Theme::Dark);
        assert_eq!(palette.sell_fill, Color::Red);
    }
}
