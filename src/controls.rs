//! Interactive control buttons: realization, state refresh and dispatch.
//!
//! Buttons are configured declaratively and realized lazily on the first
//! state push. Each button binds to one entity; pressing it dispatches a
//! domain-appropriate service call through the host's [`CommandSink`] and
//! optimistically refreshes the button shortly after, instead of waiting
//! for the backend to confirm.
//!
//! # Command Table
//!
//! | Domain                                        | Service                        |
//! |-----------------------------------------------|--------------------------------|
//! | switch, light, input_boolean, fan, automation | toggle                         |
//! | scene, script                                 | turn_on                        |
//! | cover                                         | close_cover if open, else open_cover |
//! | lock                                          | unlock if locked, else lock    |
//! | vacuum                                        | stop if cleaning, else start   |
//! | climate                                       | turn_on if off, else turn_off  |
//!
//! Unknown domains warn and dispatch nothing.

use crate::config::ButtonConfig;
use crate::host::{entity_domain, CommandSink, StateSnapshot};

/// A planned service call: `domain.service` against the button's entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub domain: String,
    pub service: &'static str,
}

/// Decide the service call for pressing a button bound to `entity_id`,
/// given the entity's current state string. `None` means the domain is not
/// controllable from a button.
pub fn plan_command(entity_id: &str, state: &str) -> Option<Command> {
    let domain = entity_domain(entity_id);
    let service = match domain {
        "switch" | "light" | "input_boolean" | "fan" | "automation" => "toggle",
        "scene" | "script" => "turn_on",
        "cover" => {
            if state == "open" {
                "close_cover"
            } else {
                "open_cover"
            }
        }
        "lock" => {
            if state == "locked" {
                "unlock"
            } else {
                "lock"
            }
        }
        "vacuum" => {
            if state == "cleaning" {
                "stop"
            } else {
                "start"
            }
        }
        "climate" => {
            if state == "off" {
                "turn_on"
            } else {
                "turn_off"
            }
        }
        other => {
            tracing::warn!("no command mapping for domain '{other}', button is inert");
            return None;
        }
    };
    Some(Command { domain: domain.to_string(), service })
}

/// Default icon label for a button without a configured glyph.
pub fn default_icon(entity_id: &str) -> &'static str {
    match entity_domain(entity_id) {
        "switch" | "input_boolean" => "PWR",
        "light" => "LMP",
        "fan" => "FAN",
        "cover" => "CVR",
        "lock" => "LCK",
        "vacuum" => "VAC",
        "climate" => "CLI",
        "scene" => "SCN",
        "script" => "SCR",
        "automation" => "AUT",
        _ => "BTN",
    }
}

// =============================================================================
// Realized Buttons
// =============================================================================

/// A configured button realized against live state. Realization happens
/// once; subsequent pushes only refresh `active`/`available`/`tooltip`.
#[derive(Clone, Debug)]
pub struct Button {
    pub config: ButtonConfig,
    /// Whether the bound entity is in an on-like state.
    pub active: bool,
    /// False when the entity is missing from the snapshot or unavailable.
    pub available: bool,
    /// Hover text: "Friendly Name: STATE".
    pub tooltip: String,
}

impl Button {
    pub fn realize(config: ButtonConfig, snapshot: &StateSnapshot) -> Self {
        let mut button = Self {
            config,
            active: false,
            available: false,
            tooltip: String::new(),
        };
        button.refresh(snapshot);
        button
    }

    /// Re-read the bound entity from a snapshot.
    pub fn refresh(&mut self, snapshot: &StateSnapshot) {
        match snapshot.get(&self.config.entity) {
            Some(state) => {
                self.active = state.is_active();
                self.available = state.state != "unavailable";
                self.tooltip = format!("{}: {}", state.display_name(), state.state.to_uppercase());
            }
            None => {
                self.active = false;
                self.available = false;
                self.tooltip = format!("{}: UNAVAILABLE", self.config.entity);
            }
        }
    }

    /// The glyph to render, configured or domain-derived.
    pub fn icon(&self) -> &str {
        self.config.icon.as_deref().unwrap_or_else(|| default_icon(&self.config.entity))
    }

    /// Dispatch the button's command through the sink. Returns `true` when
    /// a command was sent; failures are logged and swallowed.
    pub fn press(&self, snapshot: &StateSnapshot, sink: &mut dyn CommandSink) -> bool {
        let state = snapshot
            .get(&self.config.entity)
            .map(|s| s.state.as_str())
            .unwrap_or("unavailable");

        let Some(cmd) = plan_command(&self.config.entity, state) else {
            return false;
        };

        tracing::debug!(
            entity = %self.config.entity,
            service = cmd.service,
            "dispatching button command"
        );
        match sink.call(&cmd.domain, cmd.service, &self.config.entity) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(entity = %self.config.entity, %err, "button command failed");
                false
            }
        }
    }
}

/// Realize every configured button against the first snapshot.
pub fn realize_all(configs: &[ButtonConfig], snapshot: &StateSnapshot) -> Vec<Button> {
    configs.iter().cloned().map(|c| Button::realize(c, snapshot)).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ButtonPosition;
    use crate::host::{EntityState, RecordingSink};

    fn button_for(entity: &str) -> ButtonConfig {
        ButtonConfig {
            entity: entity.to_string(),
            position: ButtonPosition::BottomRight,
            icon: None,
            icon_size: 22,
        }
    }

    fn snap(entity: &str, state: &str) -> StateSnapshot {
        StateSnapshot::new().with(EntityState::new(entity, state))
    }

    // -------------------------------------------------------------------------
    // Command Table Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_toggle_domains() {
        for domain in ["switch", "light", "input_boolean", "fan", "automation"] {
            let cmd = plan_command(&format!("{domain}.x"), "on").unwrap();
            assert_eq!(cmd.service, "toggle");
            assert_eq!(cmd.domain, domain, "toggle runs against the entity's own domain");
        }
    }

    #[test]
    fn test_activation_domains() {
        assert_eq!(plan_command("scene.movie", "scening").unwrap().service, "turn_on");
        assert_eq!(plan_command("script.water", "off").unwrap().service, "turn_on");
    }

    #[test]
    fn test_cover_direction_depends_on_state() {
        assert_eq!(plan_command("cover.blind", "open").unwrap().service, "close_cover");
        assert_eq!(plan_command("cover.blind", "closed").unwrap().service, "open_cover");
        assert_eq!(plan_command("cover.blind", "closing").unwrap().service, "open_cover");
    }

    #[test]
    fn test_lock_toggles_by_state() {
        assert_eq!(plan_command("lock.front", "locked").unwrap().service, "unlock");
        assert_eq!(plan_command("lock.front", "unlocked").unwrap().service, "lock");
    }

    #[test]
    fn test_vacuum_and_climate() {
        assert_eq!(plan_command("vacuum.robo", "cleaning").unwrap().service, "stop");
        assert_eq!(plan_command("vacuum.robo", "docked").unwrap().service, "start");
        assert_eq!(plan_command("climate.living", "off").unwrap().service, "turn_on");
        assert_eq!(plan_command("climate.living", "heat").unwrap().service, "turn_off");
    }

    #[test]
    fn test_unknown_domain_is_inert() {
        assert!(plan_command("media_player.tv", "playing").is_none());
    }

    // -------------------------------------------------------------------------
    // Button Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_realize_reads_state() {
        let snapshot = StateSnapshot::new()
            .with(EntityState::new("switch.pump", "on").with_name("Garden Pump"));
        let b = Button::realize(button_for("switch.pump"), &snapshot);
        assert!(b.active);
        assert!(b.available);
        assert_eq!(b.tooltip, "Garden Pump: ON");
    }

    #[test]
    fn test_missing_entity_is_unavailable() {
        let b = Button::realize(button_for("switch.pump"), &StateSnapshot::new());
        assert!(!b.active);
        assert!(!b.available);
        assert_eq!(b.tooltip, "switch.pump: UNAVAILABLE");
    }

    #[test]
    fn test_refresh_follows_state_changes() {
        let mut b = Button::realize(button_for("switch.pump"), &snap("switch.pump", "on"));
        assert!(b.active);
        b.refresh(&snap("switch.pump", "off"));
        assert!(!b.active);
        assert!(b.available);
    }

    #[test]
    fn test_press_dispatches_per_table() {
        let snapshot = snap("cover.blind", "open");
        let b = Button::realize(button_for("cover.blind"), &snapshot);
        let mut sink = RecordingSink::default();
        assert!(b.press(&snapshot, &mut sink));
        assert_eq!(
            sink.calls,
            vec![("cover".to_string(), "close_cover".to_string(), "cover.blind".to_string())]
        );
    }

    #[test]
    fn test_press_failure_is_swallowed() {
        let snapshot = snap("switch.pump", "on");
        let b = Button::realize(button_for("switch.pump"), &snapshot);
        let mut sink = RecordingSink { fail_with: Some("offline".into()), ..Default::default() };
        assert!(!b.press(&snapshot, &mut sink), "dispatch failure reports false, never panics");
    }

    #[test]
    fn test_press_unknown_domain_sends_nothing() {
        let snapshot = snap("media_player.tv", "playing");
        let b = Button::realize(button_for("media_player.tv"), &snapshot);
        let mut sink = RecordingSink::default();
        assert!(!b.press(&snapshot, &mut sink));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn test_icon_default_by_domain() {
        let b = Button::realize(button_for("light.room"), &StateSnapshot::new());
        assert_eq!(b.icon(), "LMP");

        let mut cfg = button_for("light.room");
        cfg.icon = Some("ON".to_string());
        let b = Button::realize(cfg, &StateSnapshot::new());
        assert_eq!(b.icon(), "ON", "configured icon wins");
    }
}
