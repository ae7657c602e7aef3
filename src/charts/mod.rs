//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{format_value, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
