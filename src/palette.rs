// Categorical color assignment for chart nodes and series.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGB color, rendered as a CSS hex string in chart payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#rrggbb` and the shorthand `#rgb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color must start with '#': {s:?}"))?;
        let expand = |c: u8| (c << 4) | c;
        match hex.len() {
            6 => {
                let n = u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
                Ok(Color::rgb((n >> 16) as u8, (n >> 8) as u8, n as u8))
            }
            3 => {
                let n = u16::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
                Ok(Color::rgb(
                    expand(((n >> 8) & 0xf) as u8),
                    expand(((n >> 4) & 0xf) as u8),
                    expand((n & 0xf) as u8),
                ))
            }
            _ => Err(format!("expected #rgb or #rrggbb, got {s:?}")),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A named cycle of categorical colors.
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub name: &'static str,
    pub colors: Vec<Color>,
}

impl ColorScheme {
    /// Bright chart palette (default).
    pub fn vivid() -> Self {
        Self {
            name: "vivid",
            colors: vec![
                Color::rgb(0x54, 0x70, 0xc6),
                Color::rgb(0x91, 0xcc, 0x75),
                Color::rgb(0xfa, 0xc8, 0x58),
                Color::rgb(0xee, 0x66, 0x66),
                Color::rgb(0x73, 0xc0, 0xde),
                Color::rgb(0x3b, 0xa2, 0x72),
                Color::rgb(0xfc, 0x84, 0x52),
                Color::rgb(0x9a, 0x60, 0xb4),
                Color::rgb(0xea, 0x7c, 0xcc),
            ],
        }
    }

    /// Muted slate blues and teals.
    pub fn slate() -> Self {
        Self {
            name: "slate",
            colors: vec![
                Color::rgb(0x5e, 0x81, 0xac),
                Color::rgb(0x81, 0xa1, 0xc1),
                Color::rgb(0x64, 0x94, 0xa0),
                Color::rgb(0x88, 0xa0, 0xaf),
                Color::rgb(0x6c, 0x8e, 0xad),
                Color::rgb(0x77, 0x9e, 0xa5),
                Color::rgb(0x8f, 0xa3, 0xb4),
                Color::rgb(0x7a, 0x99, 0xa8),
            ],
        }
    }

    /// Warm terracotta and ochre tones.
    pub fn ember() -> Self {
        Self {
            name: "ember",
            colors: vec![
                Color::rgb(0xb4, 0x78, 0x64),
                Color::rgb(0xaa, 0x82, 0x5f),
                Color::rgb(0xb9, 0x91, 0x6e),
                Color::rgb(0xa5, 0x73, 0x5a),
                Color::rgb(0xaf, 0x7d, 0x69),
                Color::rgb(0xa0, 0x87, 0x64),
                Color::rgb(0xaa, 0x8c, 0x73),
                Color::rgb(0x9b, 0x78, 0x5f),
            ],
        }
    }

    /// Look a scheme up by name, falling back to the default for unknown
    /// names so a stale config value can't fail a render.
    pub fn named(name: &str) -> Self {
        match name {
            "" | "vivid" | "default" => Self::vivid(),
            "slate" => Self::slate(),
            "ember" => Self::ember(),
            other => {
                warn!("unknown color scheme {other:?}, using default");
                Self::vivid()
            }
        }
    }
}

/// Categorical color scale: hands out scheme colors round-robin and
/// memoizes the assignment, so one label keeps one color for the lifetime
/// of the scale instance. Stability across instances belongs to the caller
/// keeping the instance around, not to this type.
#[derive(Debug, Clone)]
pub struct CategoricalScale {
    colors: Vec<Color>,
    assigned: IndexMap<String, Color>,
}

impl CategoricalScale {
    pub fn new(scheme: ColorScheme) -> Self {
        let colors = if scheme.colors.is_empty() {
            ColorScheme::vivid().colors
        } else {
            scheme.colors
        };
        Self {
            colors,
            assigned: IndexMap::new(),
        }
    }

    pub fn color_for(&mut self, label: &str) -> Color {
        if let Some(color) = self.assigned.get(label) {
            return *color;
        }
        let color = self.colors[self.assigned.len() % self.colors.len()];
        self.assigned.insert(label.to_string(), color);
        color
    }
}

/// Assign a color to each distinct name, in first-seen order, using the
/// supplied palette function. The palette is trusted to be total and
/// consistent; repeated names are only looked up once.
pub fn colorize<'a, I, F>(names: I, mut palette: F) -> IndexMap<String, Color>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(&str) -> Color,
{
    let mut out = IndexMap::new();
    for name in names {
        if !out.contains_key(name) {
            let color = palette(name);
            out.insert(name.to_string(), color);
        }
    }
    out
}

/// `itemStyle` fragment of a chart node or data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemStyle {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Per-node label override carried on styled nodes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub color: Color,
    pub font_size: u32,
    pub font_weight: FontWeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_and_render_round_trip() {
        let c: Color = "#5470c6".parse().unwrap();
        assert_eq!(c, Color::rgb(0x54, 0x70, 0xc6));
        assert_eq!(c.to_css(), "#5470c6");
    }

    #[test]
    fn shorthand_hex_expands() {
        let c: Color = "#f0a".parse().unwrap();
        assert_eq!(c, Color::rgb(0xff, 0x00, 0xaa));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!("red".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn scale_memoizes_and_cycles() {
        let mut scale = CategoricalScale::new(ColorScheme {
            name: "tiny",
            colors: vec![Color::rgb(1, 1, 1), Color::rgb(2, 2, 2)],
        });
        let a = scale.color_for("a");
        let b = scale.color_for("b");
        let c = scale.color_for("c");
        assert_ne!(a, b);
        // Two colors, third label wraps around.
        assert_eq!(c, a);
        // Memoized: same label, same color, no new slot consumed.
        assert_eq!(scale.color_for("a"), a);
        assert_eq!(scale.color_for("b"), b);
    }

    #[test]
    fn unknown_scheme_falls_back_to_default() {
        let scheme = ColorScheme::named("no-such-scheme");
        assert_eq!(scheme.name, "vivid");
    }

    #[test]
    fn colorize_assigns_once_per_name() {
        let mut calls: u8 = 0;
        let map = colorize(["x", "y", "x"], |_| {
            calls += 1;
            Color::rgb(calls, 0, 0)
        });
        assert_eq!(calls, 2);
        assert_eq!(map.len(), 2);
        let names: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn color_serializes_as_css_hex() {
        let json = serde_json::to_string(&Color::rgb(0xee, 0x66, 0x66)).unwrap();
        assert_eq!(json, "\"#ee6666\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(0xee, 0x66, 0x66));
    }
}
