//! ASCII plotting for terminal output.

mod ascii;

pub use ascii::render_bar_chart;
