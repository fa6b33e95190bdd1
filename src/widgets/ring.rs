//! The circular LED cell ring.
//!
//! Cells are indexed clockwise from the top of the dial. A clockwise
//! activation lights indices `0..count`; a counter-clockwise activation
//! lights the last `count` indices, which sit just counter-clockwise of the
//! top. Unlit cells render in the neutral unlit fill unless the
//! configuration hides them entirely.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use crate::colors::{self, UNLIT};
use crate::layout::GaugeLayout;
use crate::mapping::LedActivation;

/// Whether the LED at `index` is lit under an activation.
///
/// Pure so the activation pattern is testable without a display.
pub fn led_is_lit(index: usize, total: usize, activation: LedActivation) -> bool {
    if activation.clockwise {
        index < activation.count
    } else {
        index >= total - activation.count.min(total)
    }
}

/// Draw every LED cell of the ring.
///
/// `lit_color` is the severity-resolved color for active cells. When
/// `hide_inactive` is set, unlit cells are skipped instead of drawn in the
/// unlit fill (the caller is expected to have cleared the background).
/// `glow` adds a dimmed halo behind each lit cell.
pub fn draw_led_ring<D>(
    display: &mut D,
    layout: &GaugeLayout,
    activation: LedActivation,
    lit_color: Rgb565,
    hide_inactive: bool,
    glow: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let total = layout.led_centers.len();
    let diameter = layout.led_radius * 2;
    let halo_color = colors::scale(lit_color, 0.35);

    for (index, center) in layout.led_centers.iter().enumerate() {
        let lit = led_is_lit(index, total, activation);
        if !lit && hide_inactive {
            continue;
        }
        if lit && glow {
            Circle::with_center(*center, diameter + 4)
                .into_styled(PrimitiveStyle::with_fill(halo_color))
                .draw(display)
                .ok();
        }
        let color = if lit { lit_color } else { UNLIT };
        Circle::with_center(*center, diameter)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
