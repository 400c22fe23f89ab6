//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, ACCENT};
pub use renderer::{ChartError, VolumeChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
