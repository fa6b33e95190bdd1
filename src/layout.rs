//! Pixel geometry for the gauge, derived once per configuration.
//!
//! # Optimization: Pre-computed Layout
//!
//! LED cell centers, ring radii and button rectangles depend only on the
//! configuration, never on live state, so they are computed once at widget
//! construction instead of every frame. Per-frame work is reduced to color
//! selection over the precomputed points.
//!
//! Dial angles (0 at 12-o'clock, clockwise) convert to screen coordinates
//! here with the −90° rotation, so angle 0 lands at the top of the circle.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{ButtonPosition, GaugeConfig};

/// Margin between the gauge bounding box and the LED ring, in pixels.
const RING_MARGIN: u32 = 4;

/// Padding around a button icon, in pixels.
const BUTTON_PADDING: u32 = 6;

/// An axis-aligned button hit rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonRect {
    pub top_left: Point,
    pub size: u32,
}

impl ButtonRect {
    pub fn contains(&self, p: Point) -> bool {
        let s = self.size as i32;
        p.x >= self.top_left.x
            && p.x < self.top_left.x + s
            && p.y >= self.top_left.y
            && p.y < self.top_left.y + s
    }

    pub fn center(&self) -> Point {
        let half = (self.size / 2) as i32;
        self.top_left + Point::new(half, half)
    }
}

/// Fixed pixel geometry for one gauge instance.
#[derive(Clone, Debug)]
pub struct GaugeLayout {
    /// Screen center of the dial.
    pub center: Point,
    /// Radius of the circle the LED cell centers sit on.
    pub ring_radius: f32,
    /// Radius of one LED cell.
    pub led_radius: u32,
    /// Radius of the center readout disc.
    pub center_radius: u32,
    /// Center point of every LED cell, indexed clockwise from the top.
    pub led_centers: Vec<Point>,
    /// Dial angle of every LED cell, same indexing.
    pub led_angles: Vec<f32>,
    /// Overall bounding box of the widget.
    pub bounds: Rectangle,
}

impl GaugeLayout {
    /// Compute the layout for a configuration, anchored at `origin`
    /// (top-left of the gauge bounding box).
    pub fn build(config: &GaugeConfig, origin: Point) -> Self {
        let size = config.gauge_size;
        let half = (size / 2) as i32;
        let center = origin + Point::new(half, half);

        let led_radius = (config.led_size / 2).max(1);
        // Degrade instead of underflowing when the gauge is smaller than
        // the LED cells plus margin: collapse the ring toward the center.
        let ring_radius = (size / 2).saturating_sub(led_radius + RING_MARGIN).max(1) as f32;
        let center_radius = config.center_size / 2;

        let count = config.led_count;
        let step = 360.0 / count as f32;
        let mut led_centers = Vec::with_capacity(count);
        let mut led_angles = Vec::with_capacity(count);
        for i in 0..count {
            let angle = i as f32 * step;
            led_angles.push(angle);
            led_centers.push(point_on_circle(center, angle, ring_radius));
        }

        Self {
            center,
            ring_radius,
            led_radius,
            center_radius,
            led_centers,
            led_angles,
            bounds: Rectangle::new(origin, Size::new(size, size)),
        }
    }

    /// Screen point at a dial angle and radius from the center.
    pub fn point_at(&self, dial_angle: f32, radius: f32) -> Point {
        point_on_circle(self.center, dial_angle, radius)
    }

    /// Screen point on the LED ring at a dial angle. Markers and zone
    /// endpoints sit on the same circle as the LED cells.
    pub fn ring_point(&self, dial_angle: f32) -> Point {
        self.point_at(dial_angle, self.ring_radius)
    }

    /// Whether a screen point falls inside the center readout disc.
    /// Used to route taps to the more-info event.
    pub fn contains_center(&self, p: Point) -> bool {
        let dx = (p.x - self.center.x) as f32;
        let dy = (p.y - self.center.y) as f32;
        dx * dx + dy * dy <= (self.center_radius as f32).powi(2)
    }

    /// Hit rectangle for a button in a corner of the bounding box.
    pub fn button_rect(&self, position: ButtonPosition, icon_size: u32) -> ButtonRect {
        let size = icon_size + 2 * BUTTON_PADDING;
        let s = size as i32;
        let tl = self.bounds.top_left;
        let w = self.bounds.size.width as i32;
        let h = self.bounds.size.height as i32;
        let top_left = match position {
            ButtonPosition::TopLeft => tl,
            ButtonPosition::TopRight => tl + Point::new(w - s, 0),
            ButtonPosition::BottomLeft => tl + Point::new(0, h - s),
            ButtonPosition::BottomRight => tl + Point::new(w - s, h - s),
        };
        ButtonRect { top_left, size }
    }
}

/// Convert a dial angle (0 at top, clockwise) at `radius` around `center`
/// into screen coordinates.
fn point_on_circle(center: Point, dial_angle: f32, radius: f32) -> Point {
    let rad = (dial_angle - 90.0).to_radians();
    Point::new(
        center.x + (radius * rad.cos()).round() as i32,
        center.y + (radius * rad.sin()).round() as i32,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
