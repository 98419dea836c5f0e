//! AeroDyn presentation state
//!
//! Turns a raw simulation response into chart series, KPI values and
//! narrative analysis, deterministically. Nothing in here talks to the
//! network or the terminal; the console crate renders what these models
//! hold, and the client crate decides when they are allowed to change.

pub mod chart;
pub mod kpi;
pub mod narrative;
pub mod normalize;
pub mod palette;
pub mod view;

pub use chart::*;
pub use kpi::*;
pub use narrative::*;
pub use normalize::*;
pub use palette::*;
pub use view::*;
