//! Markers and zones drawn around the LED ring.
//!
//! Static markers are radial tick lines at fixed values; zones are dotted
//! arcs spanning a value interval; dynamic markers are filled dots tracking
//! a live entity value. All positioning goes through
//! [`DialMapping::marker_angle`](crate::mapping::DialMapping::marker_angle),
//! which clamps the value into the configured range, so a marker can pin to
//! the dial edge but never leave it.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::Text;

use crate::colors;
use crate::config::{Marker, Zone};
use crate::layout::GaugeLayout;
use crate::mapping::DialMapping;
use crate::styles::{LABEL_FONT, LEFT_ALIGNED, RIGHT_ALIGNED};

/// Zone arcs are sampled in value space so bidirectional ranges follow the
/// dial's two-segment walk instead of cutting across the top.
const ZONE_SAMPLES: u32 = 24;

/// Radial reach of a marker tick past the LED cells, in pixels.
const TICK_OVERHANG: i32 = 3;

/// Label distance outside the ring, in pixels.
const LABEL_OFFSET: f32 = 14.0;

/// Draw one static marker: a radial tick across the ring plus an optional
/// label just outside it.
pub fn draw_marker<D>(display: &mut D, layout: &GaugeLayout, mapping: &DialMapping, marker: &Marker)
where
    D: DrawTarget<Color = Rgb565>,
{
    let angle = mapping.marker_angle(marker.value);
    let reach = layout.led_radius as i32 + TICK_OVERHANG;
    let inner = layout.point_at(angle, layout.ring_radius - reach as f32);
    let outer = layout.point_at(angle, layout.ring_radius + reach as f32);

    Line::new(inner, outer)
        .into_styled(PrimitiveStyle::with_stroke(marker.color, 2))
        .draw(display)
        .ok();

    if let Some(label) = &marker.label {
        draw_ring_label(display, layout, angle, label, marker.color);
    }
}

/// Draw a zone as a dotted arc outside the LED ring. The dot color is the
/// zone color dimmed by its opacity against the dark background.
pub fn draw_zone<D>(display: &mut D, layout: &GaugeLayout, mapping: &DialMapping, zone: &Zone)
where
    D: DrawTarget<Color = Rgb565>,
{
    let color = colors::scale(zone.color, zone.opacity);
    let radius = layout.ring_radius + layout.led_radius as f32 + 3.0;
    let (from, to) = if zone.from <= zone.to { (zone.from, zone.to) } else { (zone.to, zone.from) };

    for i in 0..=ZONE_SAMPLES {
        let t = i as f32 / ZONE_SAMPLES as f32;
        let value = (to - from).mul_add(t, from);
        let p = layout.point_at(mapping.marker_angle(value), radius);
        Circle::with_center(p, 2)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)
            .ok();
    }
}

/// Draw a dynamic marker: a filled dot on the ring at the tracked value,
/// with an optional label (name or live value) outside it.
pub fn draw_dynamic_marker<D>(
    display: &mut D,
    layout: &GaugeLayout,
    mapping: &DialMapping,
    value: f32,
    color: Rgb565,
    size: u32,
    label: Option<&str>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let angle = mapping.marker_angle(value);
    let p = layout.ring_point(angle);
    Circle::with_center(p, size.max(2))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();

    if let Some(label) = label {
        draw_ring_label(display, layout, angle, label, color);
    }
}

/// Place a label outside the ring at a dial angle, aligned away from the
/// dial so the text grows outward instead of across it.
fn draw_ring_label<D>(display: &mut D, layout: &GaugeLayout, angle: f32, label: &str, color: Rgb565)
where
    D: DrawTarget<Color = Rgb565>,
{
    let pos = layout.point_at(angle, layout.ring_radius + layout.led_radius as f32 + LABEL_OFFSET);
    let style = MonoTextStyle::new(LABEL_FONT, color);
    // Right half of the dial grows text rightward, left half leftward.
    let alignment = if angle % 360.0 <= 180.0 { LEFT_ALIGNED } else { RIGHT_ALIGNED };
    Text::with_text_style(label, pos, style, alignment).draw(display).ok();
}
