//! Presentation-side driving of custom status bars.
//!
//! Pure state, no rendering: a frontend reads each [`Bar`]'s width, tint, visibility
//! and icon and draws it however it likes.
//!
//! Per frame, a frontend calls [`BarSet::ensure_present`] until every custom channel has
//! a bar, [`BarSet::drive`] when values change and [`BarSet::animate`] every frame.

pub mod bar;
pub mod color;
pub mod set;

pub use bar::{ACTIVE_THRESHOLD, Bar, BarMetrics};
pub use color::{Rgba, hue_for, name_hash, tint_for};
pub use set::{BarSet, EnsureReport, SharedBars, install_factories};
