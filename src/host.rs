//! Host integration surface: entity state snapshots and command dispatch.
//!
//! The widget never talks to a backend itself. The embedding host pushes
//! [`StateSnapshot`]s into it and hands it a [`CommandSink`] for outgoing
//! service calls. Everything here is synchronous from the widget's point of
//! view; delivery is the host's problem and a failed dispatch is logged,
//! never retried.
//!
//! Entity identifiers follow the `domain.object_id` convention; the domain
//! prefix selects command semantics and default colors.

use std::collections::HashMap;

use thiserror::Error;

/// Split the domain prefix off an entity id. `"switch.pump"` yields
/// `"switch"`; an id without a dot yields the whole id.
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id.split('.').next().unwrap_or(entity_id)
}

// =============================================================================
// Entity State
// =============================================================================

/// One entity's state as pushed by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityState {
    pub entity_id: String,
    /// Raw state string ("on", "42.5", "unavailable", ...).
    pub state: String,
    /// Display name; falls back to the entity id when absent.
    pub friendly_name: Option<String>,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            friendly_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Numeric interpretation of the state, if it has one.
    /// "unavailable"/"unknown" and other non-numeric states yield `None`.
    pub fn numeric(&self) -> Option<f32> {
        self.state.trim().parse().ok()
    }

    /// Whether the state counts as "active" for button rendering.
    /// Covers the on-like states across controllable domains.
    pub fn is_active(&self) -> bool {
        matches!(self.state.as_str(), "on" | "open" | "unlocked" | "home" | "active")
    }

    pub fn display_name(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.entity_id)
    }
}

/// A point-in-time view over every entity the widget watches: the primary
/// entity, dynamic marker sources and button entities.
#[derive(Clone, Debug, Default)]
pub struct StateSnapshot {
    states: HashMap<String, EntityState>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: EntityState) {
        self.states.insert(state.entity_id.clone(), state);
    }

    /// Builder-style insert, handy in tests and demo scaffolding.
    pub fn with(mut self, state: EntityState) -> Self {
        self.insert(state);
        self
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    /// Numeric value of an entity, when present and parseable.
    pub fn numeric(&self, entity_id: &str) -> Option<f32> {
        self.get(entity_id).and_then(EntityState::numeric)
    }
}

// =============================================================================
// Command Sink
// =============================================================================

/// Dispatch failure reported by the host's sink.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("entity '{0}' is not known to the host")]
    UnknownEntity(String),

    #[error("service call failed: {0}")]
    Backend(String),
}

/// Outgoing service-call channel provided by the host.
///
/// A call is fire-and-forget: the widget optimistically refreshes button
/// state shortly after dispatch instead of waiting for confirmation.
pub trait CommandSink {
    fn call(&mut self, domain: &str, service: &str, entity_id: &str) -> Result<(), CommandError>;
}

/// Events the widget raises back to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GaugeEvent {
    /// The gauge body was tapped: the host should open its detail view
    /// for the entity.
    MoreInfo { entity_id: String },
}

/// A sink that records every call. Test and demo scaffolding.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<(String, String, String)>,
    /// When set, every call fails with this message.
    pub fail_with: Option<String>,
}

impl CommandSink for RecordingSink {
    fn call(&mut self, domain: &str, service: &str, entity_id: &str) -> Result<(), CommandError> {
        if let Some(msg) = &self.fail_with {
            return Err(CommandError::Backend(msg.clone()));
        }
        self.calls.push((domain.to_string(), service.to_string(), entity_id.to_string()));
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_domain() {
        assert_eq!(entity_domain("switch.pump"), "switch");
        assert_eq!(entity_domain("sensor.tank_level"), "sensor");
        assert_eq!(entity_domain("nodomain"), "nodomain");
    }

    #[test]
    fn test_numeric_parsing() {
        assert_eq!(EntityState::new("sensor.t", "42.5").numeric(), Some(42.5));
        assert_eq!(EntityState::new("sensor.t", " 7 ").numeric(), Some(7.0));
        assert_eq!(EntityState::new("sensor.t", "unavailable").numeric(), None);
        assert_eq!(EntityState::new("sensor.t", "unknown").numeric(), None);
        assert_eq!(EntityState::new("sensor.t", "").numeric(), None);
    }

    #[test]
    fn test_active_states() {
        for s in ["on", "open", "unlocked", "home", "active"] {
            assert!(EntityState::new("x.y", s).is_active(), "'{s}' should be active");
        }
        for s in ["off", "closed", "locked", "away", "idle", "unavailable"] {
            assert!(!EntityState::new("x.y", s).is_active(), "'{s}' should be inactive");
        }
    }

    #[test]
    fn test_display_name_fallback() {
        let bare = EntityState::new("switch.pump", "on");
        assert_eq!(bare.display_name(), "switch.pump");
        let named = bare.with_name("Garden Pump");
        assert_eq!(named.display_name(), "Garden Pump");
    }

    #[test]
    fn test_snapshot_lookup() {
        let snap = StateSnapshot::new()
            .with(EntityState::new("sensor.tank", "750"))
            .with(EntityState::new("switch.pump", "on"));
        assert_eq!(snap.numeric("sensor.tank"), Some(750.0));
        assert_eq!(snap.numeric("switch.pump"), None);
        assert!(snap.get("sensor.missing").is_none());
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::default();
        sink.call("switch", "toggle", "switch.pump").unwrap();
        assert_eq!(sink.calls.len(), 1);
        assert_eq!(sink.calls[0].1, "toggle");

        sink.fail_with = Some("offline".into());
        assert!(sink.call("light", "toggle", "light.x").is_err());
        assert_eq!(sink.calls.len(), 1, "failed calls are not recorded");
    }
}
