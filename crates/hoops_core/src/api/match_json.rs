//! Match session JSON API
//!
//! String-in / string-out bridge for hosts (game engines, UI shells). One
//! match session lives per process; every call locks it, applies one request
//! and answers with an [`ApiResponse`] carrying the current snapshot.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::Catalog;
use crate::engine::config::EngineConfig;
use crate::engine::controller::MatchController;
use crate::engine::rng::SeededRandom;
use crate::engine::snapshot::MatchSnapshot;
use crate::error::{MatchError, Result};
use crate::SCHEMA_VERSION;

// ========== Request/Response Structures ==========

#[derive(Debug, Default, Deserialize)]
pub struct CreateMatchRequest {
    /// Omitted: the built-in demo catalog.
    #[serde(default)]
    pub catalog: Option<Catalog>,
    /// Omitted: seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub config: Option<EngineConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum MatchCommand {
    Start,
    TriggerAction,
    StopCheck,
    Wait,
    Restart,
    Advance { ms: u64 },
}

impl MatchCommand {
    pub fn name(&self) -> &'static str {
        match self {
            MatchCommand::Start => "start",
            MatchCommand::TriggerAction => "trigger_action",
            MatchCommand::StopCheck => "stop_check",
            MatchCommand::Wait => "wait",
            MatchCommand::Restart => "restart",
            MatchCommand::Advance { .. } => "advance",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub schema_version: u8,
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Set on failure: whether the session is still usable.
    pub recoverable: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            success: true,
            data: Some(data),
            error: None,
            recoverable: None,
            timestamp: Utc::now(),
        }
    }

    fn err(error: &MatchError) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            success: false,
            data: None,
            error: Some(error.to_string()),
            recoverable: Some(error.is_recoverable()),
            timestamp: Utc::now(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"success":false,"error":"Serialization failed"}"#.to_string())
    }
}

fn respond<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(data) => ApiResponse::ok(data).to_json(),
        Err(e) => {
            if !e.is_recoverable() {
                warn!(error = %e, "match api request failed");
            }
            ApiResponse::<T>::err(&e).to_json()
        }
    }
}

// ========== Global State Management ==========

static MATCH_SESSION: Lazy<Mutex<Option<MatchController>>> = Lazy::new(|| Mutex::new(None));

fn session() -> MutexGuard<'static, Option<MatchController>> {
    // Poisoned lock: keep serving the last session.
    MATCH_SESSION.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session<T>(f: impl FnOnce(&mut MatchController) -> Result<T>) -> Result<T> {
    let mut guard = session();
    let controller = guard.as_mut().ok_or(MatchError::SessionNotInitialized)?;
    f(controller)
}

// ========== Public API Functions ==========

/// Creates (or replaces) the match session.
pub fn create_match_json(request_json: &str) -> String {
    respond(create_match(request_json))
}

fn create_match(request_json: &str) -> Result<MatchSnapshot> {
    let request: CreateMatchRequest = if request_json.trim().is_empty() {
        CreateMatchRequest::default()
    } else {
        serde_json::from_str(request_json)?
    };
    let catalog = match request.catalog {
        Some(catalog) => catalog,
        None => Catalog::demo()?,
    };
    let config = request.config.unwrap_or_default();
    let rng = match request.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    debug!(seed = rng.seed(), "creating match session");

    let controller = MatchController::new(catalog, config, rng)?;
    let snapshot = controller.snapshot();
    *session() = Some(controller);
    Ok(snapshot)
}

/// Applies one tagged command, e.g. `{"cmd":"advance","ms":250}`.
pub fn match_command_json(command_json: &str) -> String {
    respond(match_command(command_json))
}

fn match_command(command_json: &str) -> Result<MatchSnapshot> {
    let command: MatchCommand = serde_json::from_str(command_json)?;
    with_session(|controller| {
        debug!(cmd = command.name(), "match command");
        match command {
            MatchCommand::Start => controller.start()?,
            MatchCommand::TriggerAction => controller.trigger_action()?,
            MatchCommand::StopCheck => controller.stop_check()?,
            MatchCommand::Wait => controller.wait()?,
            MatchCommand::Restart => controller.restart()?,
            MatchCommand::Advance { ms } => {
                controller.advance_ms(ms);
            }
        }
        Ok(controller.snapshot())
    })
}

pub fn match_snapshot_json() -> String {
    respond(with_session(|controller| Ok(controller.snapshot())))
}

/// JSON Schema of [`MatchSnapshot`] for host-side validation.
pub fn snapshot_schema_json() -> String {
    let schema = schemars::schema_for!(MatchSnapshot);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

/// Drops the current session.
pub fn close_match_session() {
    *session() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    // The session is process-wide; serialize the tests that touch it.
    static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_command_requires_session() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        close_match_session();
        let response = parse(&match_command_json(r#"{"cmd":"start"}"#));
        assert_eq!(response["success"], false);
        assert_eq!(response["recoverable"], true);
        assert!(response["error"].as_str().unwrap().contains("No match session"));
    }

    #[test]
    fn test_create_with_demo_catalog() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let response = parse(&create_match_json(r#"{"seed": 42}"#));
        assert_eq!(response["success"], true);
        assert_eq!(response["schema_version"], SCHEMA_VERSION);
        assert_eq!(response["data"]["phase"], "ready");
        assert!(response["timestamp"].is_string());
        close_match_session();
    }

    #[test]
    fn test_command_flow() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        create_match_json(r#"{"seed": 7}"#);

        let response = parse(&match_command_json(r#"{"cmd":"start"}"#));
        assert_eq!(response["data"]["phase"], "playing");

        let response = parse(&match_command_json(r#"{"cmd":"advance","ms":3000}"#));
        assert_eq!(response["data"]["clock_seconds"], 117);

        let response = parse(&match_command_json(r#"{"cmd":"trigger_action"}"#));
        assert_eq!(response["data"]["interaction"], "skill_check");
        assert!(response["data"]["check"].is_object());

        let response = parse(&match_command_json(r#"{"cmd":"wait"}"#));
        assert_eq!(response["success"], false);
        assert!(response["error"].as_str().unwrap().contains("already in progress"));

        let response = parse(&match_command_json(r#"{"cmd":"stop_check"}"#));
        assert_eq!(response["success"], true);
        assert!(response["data"]["pending_outcome"].is_object());

        let response = parse(&match_snapshot_json());
        assert_eq!(response["data"]["interaction"], "skill_check");
        close_match_session();
    }

    #[test]
    fn test_unknown_command_is_parse_error() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let response = parse(&match_command_json(r#"{"cmd":"dunk"}"#));
        assert_eq!(response["success"], false);
        assert_eq!(response["recoverable"], false);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        close_match_session();
        let request = r#"{"seed":1,"config":{"clock":{"start_seconds":20,"critical_threshold_seconds":30}}}"#;
        let response = parse(&create_match_json(request));
        assert_eq!(response["success"], false);
        assert!(response["error"].as_str().unwrap().contains("critical_threshold_seconds"));
        let response = parse(&match_snapshot_json());
        assert_eq!(response["success"], false);
    }

    #[test]
    fn test_partial_config_section_accepted() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        let response = parse(&create_match_json(r#"{"seed":5,"config":{"rotation":{"playing_period_ms":6000}}}"#));
        assert_eq!(response["success"], true);
        assert_eq!(response["data"]["rotation_seconds_remaining"], 8);
        close_match_session();
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: MatchCommand = serde_json::from_str(r#"{"cmd":"advance","ms":250}"#).unwrap();
        assert_eq!(cmd, MatchCommand::Advance { ms: 250 });
        assert_eq!(cmd.name(), "advance");
    }

    #[test]
    fn test_snapshot_schema() {
        let schema = parse(&snapshot_schema_json());
        assert_eq!(schema["title"], "MatchSnapshot");
        assert!(schema["properties"]["phase"].is_object());
    }

    #[test]
    fn test_snapshot_validates_against_schema() {
        let schema = parse(&snapshot_schema_json());
        let compiled = jsonschema::JSONSchema::compile(&schema).unwrap();

        let catalog = Catalog::demo().unwrap();
        let mut controller = MatchController::with_seed(catalog, EngineConfig::default(), 3).unwrap();
        controller.start().unwrap();
        controller.trigger_action().unwrap();
        controller.advance_ms(1500);
        controller.stop_check().unwrap();

        let snapshot = serde_json::to_value(controller.snapshot()).unwrap();
        assert!(compiled.is_valid(&snapshot));
    }
}
