//! toolplot
//!
//! Declarative charts on top of `plotters`: describe a panel (or a grid of panels) as a
//! JSON/serde structure and let the crate issue the drawing calls. Pairs with the
//! `toolplot` CLI.
//!
//! ### Features
//! - One-panel renderer ([`render::plot`]) and grid driver ([`plot_subplots`]) with shared
//!   `common` options merged into every panel
//! - Tick formatting: number formats (decimals, %, K/M/B/T, locale separators),
//!   timestamps, label maps, rotation, tick grid overlay
//! - Line, stacked-area, histogram, bar, image and reference-line primitives, with
//!   linear or log axes
//! - Ready-made stacked bars, OHLC candles and log histograms ([`special`])
//! - SVG/PNG output, multi-format export with optional timestamped archive copies
//!
//! ### Example
//! ```no_run
//! use toolplot::engine::Figure;
//! use toolplot::export::{SaveOptions, save_figure};
//! use toolplot::{PlotData, Theme, plot_subplots};
//!
//! let data = PlotData::from_json_str(r#"{
//!     "plots": {
//!         "prices": {"y": [3, 1, 4, 1, 5], "name": "price", "name_position": "ylabel"},
//!         "volume": {"hist": [1, 2, 2, 3, 3, 3], "hist_kwargs": {"label": "volume"}}
//!     },
//!     "common": {"tickgrid": true},
//!     "subplots": {"n_columns": 2}
//! }"#)?;
//! let mut figure = Figure::new(Theme::default());
//! plot_subplots(&mut figure, &data)?;
//! save_figure(&figure, &SaveOptions { path: Some("market.svg".into()), ..Default::default() })?;
//! # Ok::<(), toolplot::PlotError>(())
//! ```

pub mod engine;
pub mod error;
pub mod export;
pub mod histogram;
pub mod merge;
pub mod models;
pub mod options;
pub mod render;
pub mod special;
pub mod style;
pub mod subplots;
pub mod ticks;

pub use error::{PlotError, Result};
pub use models::{CommonOptions, MergeOptions, NamePosition, PlotData, PlotDatum, PlotMap};
pub use render::plot;
pub use style::Theme;
pub use subplots::plot_subplots;
