//! Widget components for the LED ring gauge.
//!
//! This module organizes the visual components into logical submodules:
//!
//! - [`ring`]: The circular LED cell ring
//! - [`readout`]: Center disc, glow, numeric value, unit, name and trend
//! - [`markers`]: Static markers, zones and entity-driven dynamic markers
//! - [`buttons`]: Corner control buttons
//!
//! # Architecture
//!
//! Every draw function is a thin adapter: it takes a precomputed
//! [`GaugeLayout`](crate::layout::GaugeLayout) plus already-resolved state
//! (colors, activation counts, formatted strings) and emits pixels against a
//! generic `DrawTarget<Color = Rgb565>`. No value math happens in here; the
//! mapping and severity modules own that, which keeps the drawing code
//! trivially replaceable by another render backend.
//!
//! Draw errors are swallowed with `.ok()`; a failed pixel write on one frame
//! is repaired by the next redraw.

mod buttons;
mod markers;
mod readout;
mod ring;

pub use buttons::draw_button;
pub use markers::{draw_dynamic_marker, draw_marker, draw_zone};
pub use readout::{draw_glow, draw_readout, format_value, Trend};
pub use ring::{draw_led_ring, led_is_lit};
