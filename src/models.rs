use crate::error::{PlotError, Result};
use crate::options::{
    HistOptions, LegendOptions, LineOptions, RefLine, StackOptions, TickGridOptions,
    XTickFormat, YTickFormat,
};
use crate::style::Color;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Where a datum's `name` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum NamePosition {
    /// As the y-axis label, with y tick labels moved to the right side.
    Ylabel,
    /// As the panel title.
    Title,
}

impl std::str::FromStr for NamePosition {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ylabel" => Ok(NamePosition::Ylabel),
            "title" => Ok(NamePosition::Title),
            other => Err(PlotError::UnknownNamePosition(other.to_string())),
        }
    }
}

impl TryFrom<String> for NamePosition {
    type Error = PlotError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Independent-axis values: numbers, or category labels plotted at `0..n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValues {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

impl XValues {
    pub fn len(&self) -> usize {
        match self {
            XValues::Numbers(v) => v.len(),
            XValues::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric positions used for drawing.
    pub fn positions(&self) -> Cow<'_, [f64]> {
        match self {
            XValues::Numbers(v) => Cow::Borrowed(v),
            XValues::Labels(v) => Cow::Owned((0..v.len()).map(|i| i as f64).collect()),
        }
    }

    pub fn categories(&self) -> Option<&[String]> {
        match self {
            XValues::Labels(v) => Some(v),
            XValues::Numbers(_) => None,
        }
    }
}

impl From<Vec<f64>> for XValues {
    fn from(v: Vec<f64>) -> Self {
        XValues::Numbers(v)
    }
}

/// One entry of `ys`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesSpec {
    pub x: Option<XValues>,
    pub y: Vec<f64>,
    pub y_kwargs: Option<LineOptions>,
}

/// Description of one chart panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotDatum {
    pub name: Option<String>,
    pub name_position: Option<NamePosition>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub x: Option<XValues>,
    pub y: Option<Vec<f64>>,
    pub y_kwargs: Option<LineOptions>,
    pub ys: Option<Vec<SeriesSpec>>,
    pub stacks: Option<Vec<Vec<f64>>>,
    pub stacks_kwargs: Option<StackOptions>,
    pub hist: Option<Vec<f64>>,
    pub hist_kwargs: Option<HistOptions>,
    pub hlines: Option<Vec<RefLine>>,
    pub vlines: Option<Vec<RefLine>>,
    pub tickgrid: Option<bool>,
    pub tickgrid_kwargs: Option<TickGridOptions>,
    pub xtick_format: Option<XTickFormat>,
    pub ytick_format: Option<YTickFormat>,
    pub xlim: Option<[f64; 2]>,
    pub ylim: Option<[f64; 2]>,
    pub legend_kwargs: Option<LegendOptions>,
}

impl PlotDatum {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Ordered mapping from panel id to datum. Document order is render order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotMap {
    entries: Vec<(String, PlotDatum)>,
}

impl PlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end, or replace in place when the id already exists.
    pub fn insert(&mut self, id: impl Into<String>, datum: PlotDatum) {
        let id = id.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, slot)) => *slot = datum,
            None => self.entries.push((id, datum)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PlotDatum> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlotDatum)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }
}

impl<S: Into<String>> FromIterator<(S, PlotDatum)> for PlotMap {
    fn from_iter<I: IntoIterator<Item = (S, PlotDatum)>>(iter: I) -> Self {
        let mut map = PlotMap::new();
        for (id, datum) in iter {
            map.insert(id, datum);
        }
        map
    }
}

impl Serialize for PlotMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, datum) in &self.entries {
            map.serialize_entry(id, datum)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PlotMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PlotMapVisitor;

        impl<'de> Visitor<'de> for PlotMapVisitor {
            type Value = PlotMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map from plot id to plot datum")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<PlotMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, PlotDatum)> = Vec::new();
                while let Some((id, datum)) = access.next_entry::<String, PlotDatum>()? {
                    if entries.iter().any(|(k, _)| *k == id) {
                        return Err(de::Error::custom(format!("duplicate plot id: {id}")));
                    }
                    entries.push((id, datum));
                }
                Ok(PlotMap { entries })
            }
        }

        deserializer.deserialize_map(PlotMapVisitor)
    }
}

/// Option mappings of a datum that `common.merge` merges key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeOptions {
    pub y_kwargs: Option<LineOptions>,
    pub stacks_kwargs: Option<StackOptions>,
    pub hist_kwargs: Option<HistOptions>,
    pub legend_kwargs: Option<LegendOptions>,
    pub tickgrid_kwargs: Option<TickGridOptions>,
    pub xtick_format: Option<XTickFormat>,
    pub ytick_format: Option<YTickFormat>,
}

/// Shared options: a partial datum used as fallback, plus the `merge` table.
///
/// In JSON this is a single object; the `merge` key is split off and everything else
/// is read as a [`PlotDatum`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CommonOptions {
    pub defaults: PlotDatum,
    pub merge: MergeOptions,
}

impl TryFrom<Map<String, Value>> for CommonOptions {
    type Error = serde_json::Error;

    fn try_from(mut raw: Map<String, Value>) -> std::result::Result<Self, serde_json::Error> {
        let merge = match raw.remove("merge") {
            Some(v) => serde_json::from_value(v)?,
            None => MergeOptions::default(),
        };
        let defaults = serde_json::from_value(Value::Object(raw))?;
        Ok(Self { defaults, merge })
    }
}

impl Serialize for CommonOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::Error;
        let mut obj = match serde_json::to_value(&self.defaults).map_err(S::Error::custom)? {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        obj.insert(
            "merge".into(),
            serde_json::to_value(&self.merge).map_err(S::Error::custom)?,
        );
        obj.serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Subplots {
    pub n_columns: usize,
}

impl Default for Subplots {
    fn default() -> Self {
        Self { n_columns: 1 }
    }
}

/// Options forwarded to figure creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureOptions {
    /// `[width, height]` in inches.
    pub figsize: Option<[f64; 2]>,
    pub dpi: Option<f64>,
    pub facecolor: Option<Color>,
}

pub const DEFAULT_FIGURE_WIDTH: f64 = 10.0;
pub const DEFAULT_SUBPLOT_HEIGHT: f64 = 3.0;

fn default_subplot_height() -> f64 {
    DEFAULT_SUBPLOT_HEIGHT
}

/// Description of a figure made of a grid of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotData {
    pub plots: PlotMap,
    #[serde(default)]
    pub common: CommonOptions,
    #[serde(default)]
    pub subplots: Subplots,
    #[serde(default = "default_subplot_height")]
    pub subplot_height: f64,
    #[serde(default)]
    pub figure: FigureOptions,
    pub title: Option<String>,
}

impl Default for PlotData {
    fn default() -> Self {
        Self {
            plots: PlotMap::new(),
            common: CommonOptions::default(),
            subplots: Subplots::default(),
            subplot_height: DEFAULT_SUBPLOT_HEIGHT,
            figure: FigureOptions::default(),
            title: None,
        }
    }
}

impl PlotData {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
