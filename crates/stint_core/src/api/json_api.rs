use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ReconstructionConfig;
use crate::engine::{reconstruct_feed, reconstruct_game_from_rotation, GameReconstruction};
use crate::error::{Result, StintError};
use crate::ingest::{normalize_records, Roster, RotationRecord, RotationUnit};
use crate::models::{GameId, Stint, TeamId};
use crate::validate::validate_game;

pub const SCHEMA_VERSION: u8 = 1;

/// Per-player on-court rows used instead of substitution replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationInput {
    #[serde(default)]
    pub unit: RotationUnit,
    pub records: Vec<RotationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconstructRequest {
    pub schema_version: u8,
    pub game_id: GameId,
    /// Raw play-by-play records in provider shape
    pub events: Vec<Value>,
    #[serde(default)]
    pub roster: Roster,
    /// Falls back to the env-configured file, then the NBA preset
    #[serde(default)]
    pub config: Option<ReconstructionConfig>,
    #[serde(default)]
    pub rotation: Option<RotationInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team_id: TeamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stints: Option<Vec<Stint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEvent {
    pub record: usize,
    pub action_index: Option<u64>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileFailure {
    pub team_id: TeamId,
    pub at_secs: f64,
    pub tolerance_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructResponse {
    pub schema_version: u8,
    pub game_id: GameId,
    pub periods_played: u8,
    pub total_secs: f64,
    pub teams: Vec<TeamResponse>,
    pub rejected_events: Vec<RejectedEvent>,
    pub reconcile_failures: Vec<ReconcileFailure>,
    /// First partition or identity violation in the output, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl From<&GameReconstruction> for ReconstructResponse {
    fn from(game: &GameReconstruction) -> Self {
        let teams = game
            .teams
            .iter()
            .map(|team| match &team.outcome {
                Ok(stints) => TeamResponse { team_id: team.team_id, stints: Some(stints.clone()), error: None },
                Err(err) => TeamResponse {
                    team_id: team.team_id,
                    stints: None,
                    error: Some(ApiError { code: err.code().to_string(), message: err.to_string() }),
                },
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            game_id: game.game_id.clone(),
            periods_played: game.periods_played,
            total_secs: game.game_length.as_secs_f64(),
            teams,
            rejected_events: game
                .rejected_events
                .iter()
                .map(|e| RejectedEvent { record: e.record, action_index: e.action_index, reason: e.reason.clone() })
                .collect(),
            reconcile_failures: game
                .reconcile_failures
                .iter()
                .map(|f| ReconcileFailure {
                    team_id: f.team_id,
                    at_secs: f.at.as_secs_f64(),
                    tolerance_secs: f.tolerance.as_secs_f64(),
                })
                .collect(),
            validation_error: validate_game(game).err().map(|e| e.to_string()),
        }
    }
}

/// JSON API - reconstruct one game's stints from raw provider records.
///
/// # Arguments
/// * `request_json` - JSON string containing a [`ReconstructRequest`]
///
/// # Returns
/// JSON string containing a [`ReconstructResponse`]. Team failures are
/// reported inside the response; only an unreadable request is an `Err`.
pub fn reconstruct_game_json(request_json: &str) -> Result<String> {
    let request: ReconstructRequest = serde_json::from_str(request_json)?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(StintError::SchemaVersion { found: request.schema_version, expected: SCHEMA_VERSION });
    }

    let config = match request.config {
        Some(config) => {
            config.validate()?;
            config
        }
        None => ReconstructionConfig::from_env()?,
    };

    info!("Processing reconstruction request for game {}", request.game_id);

    let feed = normalize_records(&request.events, &config, &request.roster);
    let game = match &request.rotation {
        Some(rotation) => {
            let mut game = reconstruct_game_from_rotation(
                &request.game_id,
                &feed.events,
                &rotation.records,
                rotation.unit,
                &config,
            );
            game.rejected_events = feed.rejected;
            game
        }
        None => reconstruct_feed(&request.game_id, feed, &config),
    };

    let response = ReconstructResponse::from(&game);
    if let Some(violation) = &response.validation_error {
        warn!("game {}: output failed validation: {}", game.game_id, violation);
    }
    Ok(serde_json::to_string(&response)?)
}

/// JSON Schema of [`Stint`], for the persistence layer.
pub fn stint_schema_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&Stint::json_schema())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PACERS: u64 = 1610612754;

    fn sample_events() -> Vec<Value> {
        let mut events = vec![json!({"actionNumber": 1, "period": 1, "clock": "PT12M00.00S", "actionType": "period", "teamId": 0})];
        let names = ["Siakam", "Nembhard", "Turner", "Haliburton", "Nesmith"];
        for (k, (id, name)) in [1627783u64, 1629614, 1626167, 1630169, 1630174].iter().zip(names).enumerate() {
            events.push(json!({
                "actionNumber": k + 2, "period": 1, "clock": format!("PT11M{:02}.00S", 50 - k),
                "actionType": "Made Shot", "teamId": PACERS, "personId": id, "playerName": name
            }));
        }
        events.push(json!({"actionNumber": 9, "period": 1, "clock": "PT07M00.00S", "actionType": "Rebound",
                           "teamId": PACERS, "personId": 1630167, "playerName": "Toppin"}));
        events.push(json!({"actionNumber": 8, "period": 1, "clock": "PT07M00.00S", "actionType": "Substitution",
                           "teamId": PACERS, "personId": 1626167, "playerName": "Turner",
                           "description": "SUB: Toppin FOR Turner"}));
        events.push(json!({"actionNumber": 10, "period": 1, "clock": "bad", "actionType": "Foul", "teamId": PACERS}));
        events.push(json!({"actionNumber": 50, "period": 1, "clock": "PT00M00.00S", "actionType": "period", "teamId": 0}));
        events
    }

    fn request(events: Vec<Value>) -> Value {
        json!({
            "schema_version": 1,
            "game_id": "0042400407",
            "events": events,
            "config": {"clock": {"regulation_periods": 1}}
        })
    }

    #[test]
    fn test_reconstruct_game_json() {
        let result = reconstruct_game_json(&request(sample_events()).to_string()).unwrap();
        let response: ReconstructResponse = serde_json::from_str(&result).unwrap();

        assert_eq!(response.schema_version, 1);
        assert!((response.total_secs - 720.0).abs() < f64::EPSILON);
        assert_eq!(response.rejected_events.len(), 1);
        assert_eq!(response.rejected_events[0].action_index, Some(10));

        let team = &response.teams[0];
        assert_eq!(team.team_id, TeamId(PACERS));
        let stints = team.stints.as_ref().unwrap();
        assert_eq!(stints.len(), 2);
        assert!((stints[0].duration_secs - 300.0).abs() < f64::EPSILON);
        assert_eq!(stints[1].lineup_hash.as_str(), "1627783-1629614-1630167-1630169-1630174");
        assert_eq!(stints[1].start_index, Some(8));
        assert_eq!(response.validation_error, None);
    }

    #[test]
    fn test_neutral_periods_do_not_extend_game() {
        let mut events = sample_events();
        for period in 2..=4 {
            events.push(json!({"actionNumber": 100 * period, "period": period, "clock": "PT12M00.00S",
                               "actionType": "period", "teamId": 0}));
        }
        let mut req = request(events);
        req["config"] = json!({});
        let result = reconstruct_game_json(&req.to_string()).unwrap();
        let response: ReconstructResponse = serde_json::from_str(&result).unwrap();

        assert_eq!(response.periods_played, 1);
        assert_eq!(response.teams[0].stints.as_ref().map(Vec::len), Some(2));
        assert_eq!(response.validation_error, None);
    }

    #[test]
    fn test_unresolved_starters_fail_the_team() {
        let mut events = sample_events();
        events.push(json!({"actionNumber": 200, "period": 2, "clock": "PT11M00.00S", "actionType": "Made Shot",
                           "teamId": PACERS, "personId": 1627783}));
        let mut req = request(events);
        req["config"] = json!({});
        let result = reconstruct_game_json(&req.to_string()).unwrap();
        let response: ReconstructResponse = serde_json::from_str(&result).unwrap();

        // one player acts in the second period and nobody substitutes
        let error = response.teams[0].error.as_ref().unwrap();
        assert_eq!(error.code, "starting_five_unresolved");
        assert!(response.teams[0].stints.is_none());
    }

    #[test]
    fn test_schema_version_mismatch() {
        let mut req = request(Vec::new());
        req["schema_version"] = json!(2);
        let err = reconstruct_game_json(&req.to_string()).unwrap_err();
        assert!(matches!(err, StintError::SchemaVersion { found: 2, expected: 1 }));
    }

    #[test]
    fn test_invalid_request() {
        assert!(matches!(reconstruct_game_json("{not json"), Err(StintError::InvalidJson(_))));

        let mut req = request(Vec::new());
        req["config"] = json!({"clock": {"regulation_period_secs": 0}});
        assert!(matches!(reconstruct_game_json(&req.to_string()), Err(StintError::Config(_))));
    }

    #[test]
    fn test_rotation_request() {
        let rows: Vec<Value> = (1..=5)
            .map(|p| json!({"TEAM_ID": PACERS, "PERSON_ID": p, "IN_TIME_REAL": 0.0, "OUT_TIME_REAL": 7200.0}))
            .collect();
        let mut req = request(Vec::new());
        req["rotation"] = json!({"unit": "tenths", "records": rows});

        let result = reconstruct_game_json(&req.to_string()).unwrap();
        let response: ReconstructResponse = serde_json::from_str(&result).unwrap();
        let stints = response.teams[0].stints.as_ref().unwrap();
        assert_eq!(stints.len(), 1);
        assert!((stints[0].duration_secs - 720.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stint_schema_json() {
        let schema: Value = serde_json::from_str(&stint_schema_json().unwrap()).unwrap();
        assert_eq!(schema["title"], "Stint");
    }
}
