//! Gauge configuration: parsing, defaults and validation.
//!
//! Configuration is an externally authored structured record (JSON shaped).
//! Parsing applies every default exactly once; the resulting [`GaugeConfig`]
//! is immutable for the widget's lifetime and is the sole source of truth
//! for derived constants (LED count, thresholds, timing). Reconfiguration
//! replaces the whole record.
//!
//! The only fatal error is a missing `entity` field, raised synchronously at
//! parse time. Unknown fields pass through inertly; malformed colors degrade
//! to defaults with a warning rather than aborting construction.
//!
//! Severity bands, markers and the pulsation alarm range are declared in
//! real sensor units, not percentages. For a 0..3000 L tank,
//! `severity: [{ color: "#f44336", value: 750 }]` means red until 750 L.

use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;
use serde::Deserialize;
use thiserror::Error;

use crate::colors::{self, SECONDARY_TEXT, WHITE};
use crate::mapping::DialMapping;
use crate::severity::SeverityBand;

// =============================================================================
// Defaults
// =============================================================================

/// Default LED cell count around the ring.
pub const DEFAULT_LED_COUNT: usize = 100;

/// Default value-transition duration.
pub const DEFAULT_ANIMATION_MS: u64 = 800;

/// Default debounce interval between coalesced refreshes.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;

/// Default alarm pulsation period.
pub const DEFAULT_PULSE_MS: u64 = 1000;

/// Default minimum glow intensity while pulsating.
pub const DEFAULT_PULSE_INTENSITY: f32 = 0.5;

/// Default overall gauge diameter in pixels.
pub const DEFAULT_GAUGE_SIZE: u32 = 200;

/// Default LED cell diameter in pixels.
pub const DEFAULT_LED_SIZE: u32 = 8;

/// Default center readout disc diameter in pixels.
pub const DEFAULT_CENTER_SIZE: u32 = 120;

/// Default button icon size in pixels.
pub const DEFAULT_BUTTON_ICON_SIZE: u32 = 22;

/// Default center glow blur radius and spread, in pixels.
pub const DEFAULT_SHADOW_BLUR: u32 = 30;
pub const DEFAULT_SHADOW_SPREAD: u32 = 15;

// =============================================================================
// Errors
// =============================================================================

/// Fatal configuration errors. Raised at parse time only; after a
/// successful parse no condition aborts the widget.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The required `entity` field is absent or empty.
    #[error("required field `entity` is missing")]
    MissingEntity,

    /// The record itself could not be deserialized.
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

// =============================================================================
// Raw (wire) record
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    entity: Option<String>,
    name: Option<String>,
    unit: Option<String>,
    min: Option<f32>,
    max: Option<f32>,
    decimals: Option<u32>,
    leds_count: Option<usize>,
    led_size: Option<u32>,
    gauge_size: Option<u32>,
    center_size: Option<u32>,
    smooth_transitions: Option<bool>,
    animation_duration: Option<u64>,
    debounce_updates: Option<bool>,
    update_interval: Option<u64>,
    power_save_mode: Option<bool>,
    bidirectional: Option<bool>,
    hide_inactive_leds: Option<bool>,
    enable_shadow: Option<bool>,
    center_shadow: Option<bool>,
    center_shadow_blur: Option<u32>,
    center_shadow_spread: Option<u32>,
    center_shadow_pulse: Option<bool>,
    center_shadow_pulse_duration: Option<u64>,
    center_shadow_pulse_min: Option<f32>,
    center_shadow_pulse_max: Option<f32>,
    center_shadow_pulse_intensity: Option<f32>,
    severity: Vec<RawBand>,
    markers: Vec<RawMarker>,
    zones: Vec<RawZone>,
    dynamic_markers: Vec<RawDynamicMarker>,
    buttons: Vec<RawButton>,
    button_icon_size: Option<u32>,
    theme: Option<String>,
    custom_background: Option<String>,
    custom_text_color: Option<String>,
    custom_secondary_text_color: Option<String>,
    // Legacy single-switch fields, folded into `buttons` at parse time.
    show_switch_button: Option<bool>,
    switch_entity: Option<String>,
    switch_button_position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBand {
    value: f32,
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawMarker {
    value: f32,
    label: Option<String>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawZone {
    from: f32,
    to: f32,
    color: Option<String>,
    opacity: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct RawDynamicMarker {
    entity: Option<String>,
    label: Option<String>,
    color: Option<String>,
    size: Option<u32>,
    show_value: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawButton {
    entity: Option<String>,
    position: Option<String>,
    icon: Option<String>,
    icon_size: Option<u32>,
}

// =============================================================================
// Parsed configuration
// =============================================================================

/// A static decorative marker at a fixed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub value: f32,
    pub label: Option<String>,
    pub color: Rgb565,
}

/// A decorative arc zone between two values.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub from: f32,
    pub to: f32,
    pub color: Rgb565,
    pub opacity: f32,
}

/// Color selection for a dynamic marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerColor {
    /// Derive from the source entity's domain at update time.
    Auto,
    Fixed(Rgb565),
}

/// An entity-driven marker tracking a live value independent from the
/// primary gauge value.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicMarkerConfig {
    pub entity: String,
    pub label: Option<String>,
    pub color: MarkerColor,
    pub size: u32,
    pub show_value: bool,
}

/// Corner anchor for a control button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ButtonPosition {
    fn parse(s: &str) -> Self {
        match s {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            other => {
                tracing::warn!("unknown button position '{other}', using bottom-right");
                Self::BottomRight
            }
        }
    }
}

/// A configured control button bound to an external entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonConfig {
    pub entity: String,
    pub position: ButtonPosition,
    /// Icon glyph; `None` picks a default from the entity's domain.
    pub icon: Option<String>,
    pub icon_size: u32,
}

/// Center glow pulsation alarm settings. Bounds are real sensor values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseConfig {
    pub enabled: bool,
    pub duration: Duration,
    pub min: f32,
    pub max: f32,
    pub intensity: f32,
}

/// Cosmetic theme palette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub background: Rgb565,
    pub text: Rgb565,
    pub secondary_text: Rgb565,
}

impl Theme {
    /// The built-in dark-gray default theme.
    pub const DEFAULT: Self = Self {
        background: Rgb565::new(4, 8, 4),
        text: WHITE,
        secondary_text: SECONDARY_TEXT,
    };

    const LIGHT: Self = Self {
        background: Rgb565::new(30, 60, 30),
        text: Rgb565::new(6, 12, 6),
        secondary_text: Rgb565::new(12, 25, 12),
    };

    const DARK: Self = Self {
        background: Rgb565::new(2, 4, 2),
        text: Rgb565::new(29, 59, 29),
        secondary_text: Rgb565::new(23, 47, 23),
    };
}

/// Immutable per-widget configuration with all defaults applied.
#[derive(Clone, Debug)]
pub struct GaugeConfig {
    pub entity: String,
    pub name: String,
    pub unit: String,
    pub min: f32,
    pub max: f32,
    pub decimals: u32,
    pub led_count: usize,
    pub led_size: u32,
    pub gauge_size: u32,
    pub center_size: u32,
    pub smooth_transitions: bool,
    pub animation_duration: Duration,
    pub debounce_updates: bool,
    pub update_interval: Duration,
    pub power_save_mode: bool,
    pub bidirectional: bool,
    pub hide_inactive_leds: bool,
    /// Per-LED halo behind lit cells.
    pub enable_shadow: bool,
    pub center_shadow: bool,
    pub center_shadow_blur: u32,
    pub center_shadow_spread: u32,
    pub pulse: PulseConfig,
    pub severity: Vec<SeverityBand>,
    pub markers: Vec<Marker>,
    pub zones: Vec<Zone>,
    pub dynamic_markers: Vec<DynamicMarkerConfig>,
    pub buttons: Vec<ButtonConfig>,
    pub theme: Theme,
}

impl GaugeConfig {
    /// Parse an externally authored record, applying defaults once.
    ///
    /// A missing or empty `entity` is the single fatal error. Unknown
    /// fields are ignored; malformed colors fall back with a warning.
    pub fn parse(record: &serde_json::Value) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_value(record.clone())?;

        let entity = match raw.entity {
            Some(e) if !e.is_empty() => e,
            _ => return Err(ConfigError::MissingEntity),
        };

        let min = raw.min.unwrap_or(0.0);
        let max = raw.max.unwrap_or(100.0);

        let default_icon_size = raw.button_icon_size.unwrap_or(DEFAULT_BUTTON_ICON_SIZE);
        let mut buttons: Vec<ButtonConfig> = raw
            .buttons
            .into_iter()
            .filter_map(|b| {
                let Some(entity) = b.entity else {
                    tracing::warn!("button without entity, skipping");
                    return None;
                };
                Some(ButtonConfig {
                    entity,
                    position: b.position.as_deref().map(ButtonPosition::parse).unwrap_or_default(),
                    icon: b.icon,
                    icon_size: b.icon_size.unwrap_or(default_icon_size),
                })
            })
            .collect();

        // Legacy single-switch record folds into the buttons list.
        if buttons.is_empty()
            && raw.show_switch_button.unwrap_or(false)
            && let Some(switch_entity) = raw.switch_entity
        {
            buttons.push(ButtonConfig {
                entity: switch_entity,
                position: raw
                    .switch_button_position
                    .as_deref()
                    .map(ButtonPosition::parse)
                    .unwrap_or_default(),
                icon: None,
                icon_size: default_icon_size,
            });
        }

        let theme = match raw.theme.as_deref() {
            None | Some("default") => Theme::DEFAULT,
            Some("light") => Theme::LIGHT,
            Some("dark") => Theme::DARK,
            Some("custom") => Theme {
                background: color_or(raw.custom_background.as_deref(), Theme::DEFAULT.background),
                text: color_or(raw.custom_text_color.as_deref(), Theme::DEFAULT.text),
                secondary_text: color_or(
                    raw.custom_secondary_text_color.as_deref(),
                    Theme::DEFAULT.secondary_text,
                ),
            },
            Some(other) => {
                tracing::warn!("unknown theme '{other}', using default");
                Theme::DEFAULT
            }
        };

        Ok(Self {
            entity,
            name: raw.name.unwrap_or_default(),
            unit: raw.unit.unwrap_or_default(),
            min,
            max,
            decimals: raw.decimals.unwrap_or(0),
            led_count: raw.leds_count.unwrap_or(DEFAULT_LED_COUNT).max(1),
            led_size: raw.led_size.unwrap_or(DEFAULT_LED_SIZE),
            gauge_size: raw.gauge_size.unwrap_or(DEFAULT_GAUGE_SIZE),
            center_size: raw.center_size.unwrap_or(DEFAULT_CENTER_SIZE),
            smooth_transitions: raw.smooth_transitions.unwrap_or(true),
            animation_duration: Duration::from_millis(
                raw.animation_duration.unwrap_or(DEFAULT_ANIMATION_MS),
            ),
            debounce_updates: raw.debounce_updates.unwrap_or(false),
            update_interval: Duration::from_millis(
                raw.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL_MS),
            ),
            power_save_mode: raw.power_save_mode.unwrap_or(false),
            bidirectional: raw.bidirectional.unwrap_or(false),
            hide_inactive_leds: raw.hide_inactive_leds.unwrap_or(false),
            enable_shadow: raw.enable_shadow.unwrap_or(false),
            center_shadow: raw.center_shadow.unwrap_or(false),
            center_shadow_blur: raw.center_shadow_blur.unwrap_or(DEFAULT_SHADOW_BLUR),
            center_shadow_spread: raw.center_shadow_spread.unwrap_or(DEFAULT_SHADOW_SPREAD),
            pulse: PulseConfig {
                enabled: raw.center_shadow_pulse.unwrap_or(false),
                duration: Duration::from_millis(
                    raw.center_shadow_pulse_duration.unwrap_or(DEFAULT_PULSE_MS),
                ),
                // Alarm bounds default to the full gauge range.
                min: raw.center_shadow_pulse_min.unwrap_or(min),
                max: raw.center_shadow_pulse_max.unwrap_or(max),
                intensity: raw
                    .center_shadow_pulse_intensity
                    .unwrap_or(DEFAULT_PULSE_INTENSITY)
                    .clamp(0.0, 1.0),
            },
            severity: raw
                .severity
                .into_iter()
                .map(|b| SeverityBand {
                    threshold: b.value,
                    color: color_or(Some(&b.color), colors::OVER_RANGE),
                })
                .collect(),
            markers: raw
                .markers
                .into_iter()
                .map(|m| Marker {
                    value: m.value,
                    label: m.label,
                    color: color_or(m.color.as_deref(), WHITE),
                })
                .collect(),
            zones: raw
                .zones
                .into_iter()
                .map(|z| Zone {
                    from: z.from,
                    to: z.to,
                    color: color_or(z.color.as_deref(), WHITE),
                    opacity: z.opacity.unwrap_or(0.5).clamp(0.0, 1.0),
                })
                .collect(),
            dynamic_markers: raw
                .dynamic_markers
                .into_iter()
                .filter_map(|m| {
                    let Some(entity) = m.entity else {
                        tracing::warn!("dynamic marker without entity, skipping");
                        return None;
                    };
                    let color = match m.color.as_deref() {
                        None | Some("auto") => MarkerColor::Auto,
                        Some(hex) => MarkerColor::Fixed(color_or(Some(hex), colors::SEVERITY_GREEN)),
                    };
                    Some(DynamicMarkerConfig {
                        entity,
                        label: m.label,
                        color,
                        size: m.size.unwrap_or(8),
                        show_value: m.show_value.unwrap_or(false),
                    })
                })
                .collect(),
            buttons,
            theme,
        })
    }

    /// The value-to-dial mapping derived from this configuration.
    pub fn mapping(&self) -> DialMapping {
        DialMapping::new(self.min, self.max, self.bidirectional)
    }
}

/// Parse an optional hex color, warning and falling back on bad input.
fn color_or(hex: Option<&str>, fallback: Rgb565) -> Rgb565 {
    match hex {
        None => fallback,
        Some(s) => colors::parse_hex(s).unwrap_or_else(|| {
            tracing::warn!("invalid color '{s}', using fallback");
            fallback
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
