// Crate-level lints: Allow common graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f32->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // u32/i32->f32 in dial geometry
#![allow(clippy::cast_possible_wrap)] // u32->i32 wrapping is acceptable for our value ranges
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive
#![allow(clippy::struct_excessive_bools)] // GaugeConfig mirrors the flat config record

//! Circular LED ring gauge widget.
//!
//! A gauge renders a scalar entity value as a ring of discrete LED cells
//! around a center readout. Values map through a pure geometry engine
//! ([`mapping`]) to a percentage, a dial angle and an LED activation count;
//! severity bands ([`severity`]) pick the lit color; [`GaugeWidget`] binds
//! the whole thing to live state pushed by a host and drives the animated
//! effects (eased value transitions, alarm glow pulsation) off a slot-keyed
//! [`scheduler`].
//!
//! The render layer is a thin adapter over `embedded-graphics`: every draw
//! call targets a generic `DrawTarget<Color = Rgb565>`, so the same widget
//! runs against the SDL simulator, a framebuffer or a real panel driver.
//!
//! # Quick Start
//!
//! ```no_run
//! use embedded_graphics::prelude::*;
//! use led_ring_gauge::{GaugeConfig, GaugeWidget, EntityState, StateSnapshot};
//! use std::time::Instant;
//!
//! let config = GaugeConfig::parse(&serde_json::json!({
//!     "entity": "sensor.tank_level",
//!     "min": 0, "max": 3000, "unit": "L",
//!     "severity": [
//!         { "color": "#f44336", "value": 750 },
//!         { "color": "#4caf50", "value": 3000 }
//!     ]
//! }))?;
//!
//! let mut gauge = GaugeWidget::new(config, Point::zero());
//! let snapshot = StateSnapshot::new().with(EntityState::new("sensor.tank_level", "1250"));
//! gauge.push_state(snapshot, Instant::now());
//! # Ok::<(), led_ring_gauge::ConfigError>(())
//! ```

pub mod animation;
pub mod binder;
pub mod colors;
pub mod config;
pub mod controls;
pub mod host;
pub mod layout;
pub mod mapping;
pub mod scheduler;
pub mod severity;
pub mod styles;
pub mod widgets;

pub use binder::{GaugeWidget, RenderModel};
pub use config::{ConfigError, GaugeConfig};
pub use host::{CommandError, CommandSink, EntityState, GaugeEvent, StateSnapshot};
pub use mapping::{DialMapping, LedActivation};
pub use severity::SeverityBand;
pub use widgets::Trend;
