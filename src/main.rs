//! LED ring gauge simulator demo.
//!
//! Runs one fully configured gauge against the SDL simulator with a
//! synthetic tank-level signal: severity bands in sensor units, a static
//! marker, a dynamic marker tracking a second entity, an alarm pulsation
//! range and a pump toggle button wired to a local command sink.
//!
//! # Controls (Simulator Mode)
//!
//! | Input       | Action                                           |
//! |-------------|--------------------------------------------------|
//! | Mouse click | Tap the gauge (buttons, center more-info)        |
//! | `V`         | Toggle visibility (power-save demo)              |
//! | `P`         | Toggle the pump switch directly                   |
//!
//! Key repeat is ignored to prevent toggle spam when holding keys.

use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use tracing_subscriber::EnvFilter;

use led_ring_gauge::{
    CommandError, CommandSink, EntityState, GaugeConfig, GaugeEvent, GaugeWidget, StateSnapshot,
};

/// Window dimensions; the gauge plus marker labels fits in 280px.
const SCREEN_SIZE: u32 = 280;

/// Target frame time (~50 FPS). The main loop sleeps if a frame completes early.
const FRAME_TIME: Duration = Duration::from_millis(20);

/// Interval between synthetic state pushes.
const PUSH_INTERVAL: Duration = Duration::from_millis(400);

/// Demo backend: a pump switch the gauge's button toggles for real.
struct DemoBackend {
    pump_on: bool,
}

impl CommandSink for DemoBackend {
    fn call(&mut self, domain: &str, service: &str, entity_id: &str) -> Result<(), CommandError> {
        tracing::info!(domain, service, entity_id, "service call");
        if entity_id == "switch.pump" && service == "toggle" {
            self.pump_on = !self.pump_on;
        }
        Ok(())
    }
}

fn demo_config() -> GaugeConfig {
    let record = serde_json::json!({
        "entity": "sensor.tank_level",
        "name": "Tank",
        "unit": "L",
        "min": 0,
        "max": 3000,
        "decimals": 0,
        "leds_count": 60,
        "gauge_size": 240,
        "center_size": 130,
        "severity": [
            { "color": "#f44336", "value": 750 },
            { "color": "#ffeb3b", "value": 1500 },
            { "color": "#4caf50", "value": 3000 }
        ],
        "markers": [
            { "value": 750, "label": "LOW", "color": "#f44336" }
        ],
        "zones": [
            { "from": 0, "to": 750, "color": "#f44336", "opacity": 0.4 }
        ],
        "dynamic_markers": [
            { "entity": "sensor.tank_target", "color": "auto", "show_value": true }
        ],
        "center_shadow_pulse": true,
        "center_shadow_pulse_min": 0,
        "center_shadow_pulse_max": 750,
        "buttons": [
            { "entity": "switch.pump", "position": "bottom-right" }
        ]
    });
    GaugeConfig::parse(&record).expect("demo configuration is valid")
}

/// Synthetic tank level: a slow drain-and-refill cycle that regularly dips
/// into the alarm range below 750 L.
fn tank_level(t: f32) -> f32 {
    1500.0 + 1400.0 * (t * 0.25).sin()
}

fn snapshot(t: f32, pump_on: bool) -> StateSnapshot {
    let level = format!("{:.0}", tank_level(t));
    StateSnapshot::new()
        .with(EntityState::new("sensor.tank_level", level).with_name("Tank Level"))
        .with(EntityState::new("sensor.tank_target", "2400"))
        .with(EntityState::new("switch.pump", if pump_on { "on" } else { "off" }).with_name("Pump"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut display: SimulatorDisplay<Rgb565> =
        SimulatorDisplay::new(Size::new(SCREEN_SIZE, SCREEN_SIZE));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("LED Ring Gauge", &output_settings);

    let mut gauge = GaugeWidget::new(demo_config(), Point::new(20, 20));
    let mut backend = DemoBackend { pump_on: false };

    let mut visible = true;
    let mut history: Vec<f32> = Vec::new();
    let start = Instant::now();
    let mut last_push: Option<Instant> = None;

    display.clear(gauge.config().theme.background).ok();
    window.update(&display);

    'running: loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    if let Some(GaugeEvent::MoreInfo { entity_id }) =
                        gauge.handle_click(point, &mut backend, frame_start)
                    {
                        tracing::info!(%entity_id, "more-info requested");
                    }
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::V => {
                            visible = !visible;
                            gauge.set_visible(visible, frame_start);
                            tracing::info!(visible, "visibility toggled");
                        }
                        Keycode::P => {
                            backend.pump_on = !backend.pump_on;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // Push a fresh snapshot on the configured cadence, like a host
        // forwarding backend state changes.
        if last_push.is_none_or(|lp| frame_start.duration_since(lp) >= PUSH_INTERVAL) {
            last_push = Some(frame_start);
            let t = start.elapsed().as_secs_f32();
            gauge.push_state(snapshot(t, backend.pump_on), frame_start);

            history.push(tank_level(t));
            if history.len() > 50 {
                history.remove(0);
            }
            gauge.set_history(&history);
        }

        let dirty = gauge.tick(frame_start);
        if dirty || visible {
            display.clear(gauge.config().theme.background).ok();
            if visible {
                gauge.draw(&mut display, frame_start);
            }
        }
        window.update(&display);

        // Frame pacing: sleep off whatever is left of the frame budget.
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            thread::sleep(FRAME_TIME - elapsed);
        }
    }

    gauge.teardown();
}
