//! Ready-made charts assembled from the panel primitives: stacked bars, OHLC candles and
//! log-scaled histograms.

pub mod bar;
pub mod candles;
pub mod histograms;

pub use bar::{BarSeries, plot_bar};
pub use candles::{Ohlc, plot_ohlc_as_lines, plot_ohlc_candles, plot_ohlc_candles_raw_overlay};
pub use histograms::{
    Hist2dPlotOptions, LogHistOptions, get_ticks, plot_2d_log_histogram, plot_log_x_histogram,
};
