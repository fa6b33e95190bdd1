//! The gauge widget: binds live entity state to the dial.
//!
//! [`GaugeWidget`] owns the full update pipeline:
//!
//! 1. The host pushes [`StateSnapshot`]s; every push caches the snapshot
//!    and updates dynamic markers unconditionally.
//! 2. Buttons are realized lazily on the first push, then only refreshed.
//! 3. With power-save on, pushes while hidden go no further; becoming
//!    visible forces a refresh from the cached snapshot.
//! 4. With debouncing on, a refresh is deferred by the update interval and
//!    every further push defers it again, so a burst collapses into one
//!    refresh of the latest value.
//! 5. A refresh either snaps the rendered value or starts a 20-step eased
//!    transition from the last rendered value, and starts or stops the
//!    alarm pulsation.
//!
//! The widget is single-threaded; the host pumps [`GaugeWidget::tick`] from
//! its frame loop and redraws when it returns true.

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::animation::{self, Pulsation, ValueTransition, TRANSITION_STEPS};
use crate::colors::{self, UNLIT};
use crate::config::{GaugeConfig, MarkerColor};
use crate::controls::{self, Button};
use crate::host::{entity_domain, CommandSink, GaugeEvent, StateSnapshot};
use crate::layout::GaugeLayout;
use crate::mapping::{DialMapping, LedActivation};
use crate::scheduler::{EffectSlot, Scheduler};
use crate::severity;
use crate::widgets::{self, Trend};

/// Delay before the optimistic button refresh after a dispatched command.
const BUTTON_REFRESH_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

/// Minimum change in the primary value worth animating.
const VALUE_EPSILON: f32 = 1e-6;

/// Minimum difference between recent and older history averages to show a
/// rising/falling arrow; below it the trend reads as flat.
const TREND_THRESHOLD: f32 = 0.5;

/// Everything the render pass needs for one frame, resolved from live
/// state. Dynamic markers are read from the cached snapshot separately.
#[derive(Clone, Debug)]
pub struct RenderModel {
    /// Rendered (possibly mid-transition) value; `None` when the primary
    /// entity has no numeric state.
    pub value: Option<f32>,
    /// Readout text: the real value at configured decimals, or "N/A".
    pub value_text: heapless::String<16>,
    pub activation: LedActivation,
    pub led_color: Rgb565,
    /// Glow intensity in [0, 1] when the center glow should render.
    pub glow: Option<f32>,
    pub trend: Option<Trend>,
}

struct ActivePulse {
    params: Pulsation,
    started: Instant,
}

/// A circular LED gauge bound to one primary entity.
pub struct GaugeWidget {
    config: GaugeConfig,
    mapping: DialMapping,
    layout: GaugeLayout,
    scheduler: Scheduler,
    snapshot: StateSnapshot,
    /// Realized once on the first push, refreshed afterwards.
    buttons: Option<Vec<Button>>,
    visible: bool,
    /// Last primary value observed in a push. Change detection compares
    /// against this, never against the mid-flight rendered value.
    observed_value: Option<f32>,
    rendered_value: Option<f32>,
    transition: Option<ValueTransition>,
    pulse: Option<ActivePulse>,
    history: Vec<f32>,
    torn_down: bool,
}

impl GaugeWidget {
    /// Build a widget from a parsed configuration, anchored at `origin`.
    pub fn new(config: GaugeConfig, origin: Point) -> Self {
        let mapping = config.mapping();
        let layout = GaugeLayout::build(&config, origin);
        tracing::info!(entity = %config.entity, leds = config.led_count, "gauge created");
        Self {
            config,
            mapping,
            layout,
            scheduler: Scheduler::new(),
            snapshot: StateSnapshot::new(),
            buttons: None,
            visible: true,
            observed_value: None,
            rendered_value: None,
            transition: None,
            pulse: None,
            history: Vec::new(),
            torn_down: false,
        }
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn layout(&self) -> &GaugeLayout {
        &self.layout
    }

    pub fn buttons(&self) -> &[Button] {
        self.buttons.as_deref().unwrap_or(&[])
    }

    /// The value currently on screen, mid-transition values included.
    pub fn rendered_value(&self) -> Option<f32> {
        self.rendered_value
    }

    // -------------------------------------------------------------------------
    // State intake
    // -------------------------------------------------------------------------

    /// Push a fresh snapshot from the host.
    ///
    /// The snapshot is always cached and dynamic markers always follow it;
    /// power-save and debouncing only gate the primary refresh.
    pub fn push_state(&mut self, snapshot: StateSnapshot, now: Instant) {
        if self.torn_down {
            return;
        }
        self.snapshot = snapshot;

        if self.buttons.is_none() {
            self.buttons = Some(controls::realize_all(&self.config.buttons, &self.snapshot));
        }

        if self.config.power_save_mode && !self.visible {
            tracing::trace!(entity = %self.config.entity, "hidden, refresh skipped");
            return;
        }

        if self.config.debounce_updates {
            // Trailing edge: each push pushes the pending refresh out again.
            self.scheduler
                .schedule_once(EffectSlot::Debounce, self.config.update_interval, now);
        } else {
            self.apply_refresh(now);
        }
    }

    /// Show or hide the widget. Becoming visible forces a refresh from the
    /// cached snapshot so a power-saving gauge catches up immediately.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        if self.torn_down {
            return;
        }
        let was_hidden = !self.visible;
        self.visible = visible;
        if visible && was_hidden {
            self.apply_refresh(now);
        }
    }

    /// Replace the value history window used for the trend arrow.
    pub fn set_history(&mut self, samples: &[f32]) {
        self.history.clear();
        self.history.extend_from_slice(samples);
    }

    /// Apply the cached snapshot to the dial: start or snap the value
    /// transition and reconcile the alarm pulsation.
    fn apply_refresh(&mut self, now: Instant) {
        let target = self.snapshot.numeric(&self.config.entity);

        if let Some(buttons) = &mut self.buttons {
            for b in buttons {
                b.refresh(&self.snapshot);
            }
        }

        match target {
            None => {
                tracing::warn!(entity = %self.config.entity, "primary entity missing or non-numeric");
                // Unavailable primary: clear the dial, stop every effect.
                self.observed_value = None;
                self.rendered_value = None;
                self.transition = None;
                self.scheduler.cancel(EffectSlot::Transition);
                self.stop_pulse();
            }
            Some(target) => {
                self.retarget(target, now);
                self.reconcile_pulse(target, now);
            }
        }
    }

    fn retarget(&mut self, target: f32, now: Instant) {
        // A re-push of the same value must not restart a transition in
        // flight, so compare against the last observed value rather than
        // the rendered (possibly mid-animation) one.
        let unchanged = self
            .observed_value
            .is_some_and(|prev| (target - prev).abs() < VALUE_EPSILON);
        self.observed_value = Some(target);
        if unchanged {
            return;
        }

        let from = match self.rendered_value {
            // First value ever: nothing to animate from.
            None => {
                self.rendered_value = Some(target);
                self.transition = None;
                self.scheduler.cancel(EffectSlot::Transition);
                return;
            }
            Some(v) => v,
        };

        if (target - from).abs() < VALUE_EPSILON {
            self.rendered_value = Some(target);
            self.transition = None;
            self.scheduler.cancel(EffectSlot::Transition);
            return;
        }

        if !self.config.smooth_transitions {
            self.rendered_value = Some(target);
            self.transition = None;
            self.scheduler.cancel(EffectSlot::Transition);
            return;
        }

        // Cancel-and-replace: restart from wherever the dial is right now.
        self.transition = Some(ValueTransition::new(from, target));
        self.scheduler.schedule_repeating(
            EffectSlot::Transition,
            ValueTransition::step_duration(self.config.animation_duration),
            Some(TRANSITION_STEPS),
            now,
        );
    }

    fn reconcile_pulse(&mut self, value: f32, now: Instant) {
        let cfg = self.config.pulse;
        let alarmed = cfg.enabled && animation::in_alarm_range(value, cfg.min, cfg.max);
        match (alarmed, self.pulse.is_some()) {
            (true, false) => {
                tracing::debug!(entity = %self.config.entity, value, "alarm pulsation started");
                self.pulse = Some(ActivePulse {
                    params: Pulsation::new(cfg.duration, cfg.intensity),
                    started: now,
                });
                self.scheduler
                    .schedule_repeating(EffectSlot::Pulsation, animation::PULSE_TICK, None, now);
            }
            (false, true) => {
                tracing::debug!(entity = %self.config.entity, value, "alarm pulsation stopped");
                self.stop_pulse();
            }
            _ => {}
        }
    }

    fn stop_pulse(&mut self) {
        self.pulse = None;
        self.scheduler.cancel(EffectSlot::Pulsation);
    }

    // -------------------------------------------------------------------------
    // Frame loop
    // -------------------------------------------------------------------------

    /// Pump pending effects. Returns `true` when something changed and the
    /// widget should be redrawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        let mut dirty = false;

        if self.scheduler.poll(EffectSlot::Debounce, now) > 0 {
            self.apply_refresh(now);
            dirty = true;
        }

        let steps = self.scheduler.poll(EffectSlot::Transition, now);
        if steps > 0
            && let Some(transition) = &mut self.transition
        {
            let mut value = transition.target();
            for _ in 0..steps {
                value = transition.advance();
            }
            self.rendered_value = Some(value);
            if transition.is_complete() {
                self.transition = None;
            }
            dirty = true;
        }

        if self.scheduler.poll(EffectSlot::Pulsation, now) > 0 {
            dirty = true;
        }

        if self.scheduler.poll(EffectSlot::ButtonRefresh, now) > 0 {
            if let Some(buttons) = &mut self.buttons {
                for b in buttons {
                    b.refresh(&self.snapshot);
                }
            }
            dirty = true;
        }

        dirty
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Route a tap. Button rectangles win over the center disc; a center
    /// tap raises the more-info event for the primary entity.
    pub fn handle_click(
        &mut self,
        point: Point,
        sink: &mut dyn CommandSink,
        now: Instant,
    ) -> Option<GaugeEvent> {
        if self.torn_down {
            return None;
        }

        let hit = self.buttons().iter().position(|b| {
            self.layout
                .button_rect(b.config.position, b.config.icon_size)
                .contains(point)
        });
        if let Some(index) = hit {
            self.press_button(index, sink, now);
            return None;
        }

        if self.layout.contains_center(point) {
            return Some(GaugeEvent::MoreInfo { entity_id: self.config.entity.clone() });
        }
        None
    }

    /// Press a button by index: dispatch its command and schedule the
    /// optimistic state refresh shortly after.
    pub fn press_button(&mut self, index: usize, sink: &mut dyn CommandSink, now: Instant) {
        if self.torn_down {
            return;
        }
        let Some(button) = self.buttons.as_ref().and_then(|b| b.get(index)) else {
            return;
        };
        if button.press(&self.snapshot, sink) {
            self.scheduler
                .schedule_once(EffectSlot::ButtonRefresh, BUTTON_REFRESH_DELAY, now);
        }
    }

    /// Release every scheduled effect. Idempotent; a torn-down widget
    /// ignores pushes, ticks and clicks.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.scheduler.cancel_all();
        self.transition = None;
        self.pulse = None;
        self.torn_down = true;
        tracing::info!(entity = %self.config.entity, "gauge torn down");
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    fn trend(&self) -> Option<Trend> {
        if self.history.len() < 4 {
            return None;
        }
        let mid = self.history.len() / 2;
        let older = self.history[..mid].iter().sum::<f32>() / mid as f32;
        let recent =
            self.history[mid..].iter().sum::<f32>() / (self.history.len() - mid) as f32;
        let delta = recent - older;
        if delta > TREND_THRESHOLD {
            Some(Trend::Rising)
        } else if delta < -TREND_THRESHOLD {
            Some(Trend::Falling)
        } else {
            Some(Trend::Flat)
        }
    }

    /// Resolve the frame's render model from current state.
    pub fn model(&self, now: Instant) -> RenderModel {
        let Some(value) = self.rendered_value else {
            return RenderModel {
                value: None,
                value_text: heapless::String::try_from("N/A").unwrap_or_default(),
                activation: LedActivation { count: 0, clockwise: true },
                led_color: UNLIT,
                glow: None,
                trend: None,
            };
        };

        let percentage = self.mapping.percentage(value);
        let led_color =
            severity::resolve(percentage, &self.config.severity, self.config.min, self.config.max);

        let glow = match &self.pulse {
            Some(pulse) => Some(pulse.params.intensity_at(now.saturating_duration_since(pulse.started))),
            None if self.config.center_shadow => Some(1.0),
            None => None,
        };

        RenderModel {
            value: Some(value),
            value_text: widgets::format_value(value, self.config.decimals),
            activation: self.mapping.led_activation(value, self.config.led_count),
            led_color,
            glow,
            trend: self.trend(),
        }
    }

    /// Draw the whole widget: glow, ring, markers, zones, readout and
    /// buttons, in back-to-front order.
    pub fn draw<D>(&self, display: &mut D, now: Instant)
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let model = self.model(now);

        if let Some(intensity) = model.glow {
            widgets::draw_glow(
                display,
                &self.layout,
                model.led_color,
                intensity,
                self.config.center_shadow_blur,
                self.config.center_shadow_spread,
            );
        }

        widgets::draw_led_ring(
            display,
            &self.layout,
            model.activation,
            model.led_color,
            self.config.hide_inactive_leds,
            self.config.enable_shadow,
        );

        for zone in &self.config.zones {
            widgets::draw_zone(display, &self.layout, &self.mapping, zone);
        }
        for marker in &self.config.markers {
            widgets::draw_marker(display, &self.layout, &self.mapping, marker);
        }
        self.draw_dynamic_markers(display);

        widgets::draw_readout(
            display,
            &self.layout,
            self.config.theme,
            &self.config.name,
            &model.value_text,
            &self.config.unit,
            model.trend,
        );

        for button in self.buttons() {
            widgets::draw_button(display, &self.layout, self.config.theme, button);
        }
    }

    /// Dynamic markers read the cached snapshot directly, so they move on
    /// every push even while debouncing or power-saving gates the dial.
    fn draw_dynamic_markers<D>(&self, display: &mut D)
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for marker in &self.config.dynamic_markers {
            let Some(value) = self.snapshot.numeric(&marker.entity) else {
                continue;
            };
            let color = match marker.color {
                MarkerColor::Fixed(c) => c,
                MarkerColor::Auto => colors::domain_color(entity_domain(&marker.entity)),
            };
            let formatted;
            let label = if marker.show_value {
                formatted = self.dynamic_marker_label(value);
                Some(formatted.as_str())
            } else {
                marker.label.as_deref()
            };
            widgets::draw_dynamic_marker(
                display,
                &self.layout,
                &self.mapping,
                value,
                color,
                marker.size,
                label,
            );
        }
    }

    /// Value label for a dynamic marker: one decimal plus the gauge unit.
    fn dynamic_marker_label(&self, value: f32) -> heapless::String<24> {
        use std::fmt::Write;
        let mut text = heapless::String::new();
        if self.config.unit.is_empty() {
            write!(text, "{value:.1}").ok();
        } else {
            write!(text, "{value:.1} {}", self.config.unit).ok();
        }
        text
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
