//! Colors, line dashes, markers, and figure-wide style presets.
//!
//! Colors are validated when a configuration is parsed: a color string is either a
//! named color (`"black"`, `"tab:blue"`, ...), a cycle reference (`"C0"`..`"C9"`), or a
//! hex triplet (`"#4472C4"`). Anything else is rejected with [`PlotError::Config`].

use crate::error::{PlotError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

/// Microsoft Office (2013+) chart series palette, used as the default color cycle.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [Rgb8; 10] = [
    Rgb8::new(68, 114, 196),  // blue      (#4472C4)
    Rgb8::new(237, 125, 49),  // orange    (#ED7D31)
    Rgb8::new(165, 165, 165), // gray      (#A5A5A5)
    Rgb8::new(255, 192, 0),   // gold      (#FFC000)
    Rgb8::new(91, 155, 213),  // light blue(#5B9BD5)
    Rgb8::new(112, 173, 71),  // green     (#70AD47)
    Rgb8::new(38, 68, 120),   // dark blue (#264478)
    Rgb8::new(158, 72, 14),   // dark org. (#9E480E)
    Rgb8::new(99, 99, 99),    // dark gray (#636363)
    Rgb8::new(153, 115, 0),   // brownish  (#997300)
];

/// Get the `idx`-th color of the default cycle.
#[inline]
pub fn cycle_color(idx: usize) -> Rgb8 {
    OFFICE10[idx % OFFICE10.len()]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A validated color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Rgb8);

impl Color {
    pub const BLACK: Color = Color(Rgb8::new(0, 0, 0));
    pub const WHITE: Color = Color(Rgb8::new(255, 255, 255));
    pub const RED: Color = Color(Rgb8::new(214, 39, 40));
    pub const GREEN: Color = Color(Rgb8::new(44, 160, 44));

    pub fn rgb(self) -> Rgb8 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.0.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = PlotError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl std::str::FromStr for Color {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        if let Some(hex) = key.strip_prefix('#') {
            return parse_hex(hex)
                .map(Color)
                .ok_or_else(|| PlotError::Config(format!("invalid hex color: {s}")));
        }
        if let Some(n) = key.strip_prefix('c')
            && let Ok(i) = n.parse::<usize>()
        {
            return Ok(Color(cycle_color(i)));
        }
        let rgb = match key.trim_start_matches("tab:") {
            "black" | "k" => Rgb8::new(0, 0, 0),
            "white" | "w" => Rgb8::new(255, 255, 255),
            "red" | "r" => Rgb8::new(214, 39, 40),
            "green" | "g" => Rgb8::new(44, 160, 44),
            "blue" | "b" => Rgb8::new(31, 119, 180),
            "orange" => Rgb8::new(255, 127, 14),
            "purple" => Rgb8::new(148, 103, 189),
            "brown" => Rgb8::new(140, 86, 75),
            "pink" => Rgb8::new(227, 119, 194),
            "gray" | "grey" => Rgb8::new(127, 127, 127),
            "olive" => Rgb8::new(188, 189, 34),
            "cyan" | "c" => Rgb8::new(23, 190, 207),
            "yellow" | "y" => Rgb8::new(255, 215, 0),
            "magenta" | "m" => Rgb8::new(255, 0, 255),
            _ => return Err(PlotError::Config(format!("unknown color: {s}"))),
        };
        Ok(Color(rgb))
    }
}

fn parse_hex(hex: &str) -> Option<Rgb8> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb8::new(byte(0)?, byte(2)?, byte(4)?))
}

/// Line dash pattern. Accepts both names and the short engine codes (`"--"`, `":"`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDash {
    #[default]
    #[serde(rename = "solid", alias = "-")]
    Solid,
    #[serde(rename = "dashed", alias = "--")]
    Dash,
    #[serde(rename = "dotted", alias = ":")]
    Dot,
    #[serde(rename = "dashdot", alias = "-.")]
    DashDot,
    /// No connecting line; markers only.
    #[serde(rename = "none", alias = "None", alias = "")]
    Blank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    /// Small dot, drawn at a third of the marker size.
    #[serde(alias = ".")]
    Point,
    #[serde(alias = "o")]
    Circle,
    #[serde(alias = "s")]
    Square,
    #[serde(alias = "^")]
    Triangle,
    #[serde(alias = "D")]
    Diamond,
    #[serde(alias = "+")]
    Cross,
    X,
}

/// Figure-wide style preset. Font sizes are in points and scaled by the figure dpi at draw
/// time; the per-element sizes fall back to `font_size` when unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    /// `sans-serif`, `serif`, `monospace`, or a family name registered from `TOOLPLOT_FONT`.
    pub font_family: String,
    pub font_size: f64,
    pub title_size: Option<f64>,
    pub label_size: Option<f64>,
    pub tick_size: Option<f64>,
    pub legend_size: Option<f64>,
    pub line_width: f64,
    pub dpi: f64,
    pub facecolor: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".into(),
            font_size: 10.0,
            title_size: Some(12.0),
            label_size: None,
            tick_size: None,
            legend_size: None,
            line_width: 1.5,
            dpi: 100.0,
            facecolor: Color::WHITE,
        }
    }
}

impl Theme {
    /// Large fonts and thick lines for slides and reports.
    pub fn presentation() -> Self {
        Self {
            font_size: 18.0,
            title_size: Some(24.0),
            label_size: Some(20.0),
            line_width: 3.0,
            ..Self::default()
        }
    }

    /// Resolve a preset by name (`default`, `presentation`).
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "presentation" | "large" => Ok(Self::presentation()),
            other => Err(PlotError::Config(format!("unknown style preset: {other}"))),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn title_pt(&self) -> f64 {
        self.title_size.unwrap_or(self.font_size * 1.2)
    }

    pub fn label_pt(&self) -> f64 {
        self.label_size.unwrap_or(self.font_size)
    }

    pub fn tick_pt(&self) -> f64 {
        self.tick_size.unwrap_or(self.font_size)
    }

    pub fn legend_pt(&self) -> f64 {
        self.legend_size.unwrap_or(self.font_size)
    }
}

/// Color map for image plots, as control points interpolated linearly in RGB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    Viridis,
    /// Reversed spectral map: white/grey for low values through red to black.
    #[default]
    #[serde(alias = "nipy_spectral_r")]
    SpectralR,
    Greys,
}

const CMAP_VIRIDIS: &[(f64, Rgb8)] = &[
    (0.0, Rgb8::new(68, 1, 84)),
    (0.25, Rgb8::new(59, 82, 139)),
    (0.5, Rgb8::new(33, 145, 140)),
    (0.75, Rgb8::new(94, 201, 98)),
    (1.0, Rgb8::new(253, 231, 37)),
];

const CMAP_SPECTRAL_R: &[(f64, Rgb8)] = &[
    (0.0, Rgb8::new(204, 204, 204)),
    (0.1, Rgb8::new(255, 0, 0)),
    (0.25, Rgb8::new(255, 153, 0)),
    (0.4, Rgb8::new(204, 255, 0)),
    (0.55, Rgb8::new(0, 187, 0)),
    (0.7, Rgb8::new(0, 153, 221)),
    (0.85, Rgb8::new(119, 0, 136)),
    (1.0, Rgb8::new(0, 0, 0)),
];

const CMAP_GREYS: &[(f64, Rgb8)] = &[(0.0, Rgb8::new(255, 255, 255)), (1.0, Rgb8::new(0, 0, 0))];

impl Colormap {
    fn points(self) -> &'static [(f64, Rgb8)] {
        match self {
            Colormap::Viridis => CMAP_VIRIDIS,
            Colormap::SpectralR => CMAP_SPECTRAL_R,
            Colormap::Greys => CMAP_GREYS,
        }
    }

    /// Color at `t` in `0.0..=1.0`; values outside are clamped to the ends.
    pub fn map(self, t: f64) -> Rgb8 {
        let pts = self.points();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Some(i) = pts.windows(2).position(|w| t <= w[1].0) else {
            return pts[pts.len() - 1].1;
        };
        let ((fa, a), (fb, b)) = (pts[i], pts[i + 1]);
        let k = (t - fa) / (fb - fa);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * k).round() as u8;
        Rgb8::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
    }
}

/// Font files tried per generic family when `TOOLPLOT_FONT` is not set.
fn font_candidates(family: &str) -> &'static [&'static str] {
    match family {
        "serif" => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
            "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
            "/usr/share/fonts/TTF/DejaVuSerif.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
            "C:\\Windows\\Fonts\\times.ttf",
        ],
        "monospace" => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Courier New.ttf",
            "C:\\Windows\\Fonts\\cour.ttf",
        ],
        _ => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ],
    }
}

static FONTS_READY: Mutex<Vec<(String, bool)>> = Mutex::new(Vec::new());

/// Register a font for `family` with the `ab_glyph` text path, which does not discover OS
/// fonts. `TOOLPLOT_FONT` wins; otherwise a system font matching the generic family is used.
///
/// Returns whether the family can render text. The lookup runs once per family.
pub fn ensure_font_registered(family: &str) -> bool {
    let mut ready = match FONTS_READY.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some((_, ok)) = ready.iter().find(|(f, _)| f == family) {
        return *ok;
    }

    let from_env = std::env::var("TOOLPLOT_FONT").ok();
    let candidates = from_env
        .iter()
        .map(String::as_str)
        .chain(font_candidates(family).iter().copied());
    let mut ok = false;
    for path in candidates {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        // plotters keeps a reference to the font for the process lifetime
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        let name: &'static str = Box::leak(family.to_string().into_boxed_str());
        if plotters::style::register_font(name, plotters::style::FontStyle::Normal, bytes).is_ok()
        {
            log::debug!("registered font {path} as {family}");
            ok = true;
            break;
        }
    }
    if !ok {
        log::warn!("no usable font found for {family}; set TOOLPLOT_FONT to a .ttf file");
    }
    ready.push((family.to_string(), ok));
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_hex_and_cycle_colors() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#4472C4".parse::<Color>().unwrap().rgb(),
            Rgb8::new(68, 114, 196)
        );
        assert_eq!("C1".parse::<Color>().unwrap().rgb(), cycle_color(1));
        assert_eq!(
            "tab:orange".parse::<Color>().unwrap().rgb(),
            Rgb8::new(255, 127, 14)
        );
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!(matches!(
            "mauve-ish".parse::<Color>(),
            Err(PlotError::Config(_))
        ));
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn dash_accepts_short_codes() {
        let d: LineDash = serde_json::from_str("\"--\"").unwrap();
        assert_eq!(d, LineDash::Dash);
        let d: LineDash = serde_json::from_str("\"dotted\"").unwrap();
        assert_eq!(d, LineDash::Dot);
    }

    #[test]
    fn presets_resolve() {
        assert_eq!(Theme::preset("presentation").unwrap().font_size, 18.0);
        assert!(Theme::preset("nope").is_err());
    }

    #[test]
    fn element_sizes_fall_back_to_font_size() {
        let theme: Theme = serde_json::from_str(r#"{"font_size": 14}"#).unwrap();
        assert_eq!(theme.tick_pt(), 14.0);
        assert_eq!(theme.legend_pt(), 14.0);
        assert_eq!(theme.title_pt(), 12.0);
        let theme: Theme = serde_json::from_str(r#"{"font_size": 20, "title_size": null}"#).unwrap();
        assert_eq!(theme.title_pt(), 24.0);
    }

    #[test]
    fn non_ascii_hex_is_a_config_error() {
        assert!(matches!("#€".parse::<Color>(), Err(PlotError::Config(_))));
        assert!(matches!("#ééé".parse::<Color>(), Err(PlotError::Config(_))));
        assert!("#12g".parse::<Color>().is_err());
    }

    #[test]
    fn colormap_interpolates_and_clamps() {
        assert_eq!(Colormap::Greys.map(0.0), Rgb8::new(255, 255, 255));
        assert_eq!(Colormap::Greys.map(2.0), Rgb8::new(0, 0, 0));
        assert_eq!(Colormap::Greys.map(0.5), Rgb8::new(128, 128, 128));
        assert_eq!(Colormap::Viridis.map(0.25), Rgb8::new(59, 82, 139));
    }
}
