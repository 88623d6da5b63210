pub mod json_api;

pub use json_api::{
    reconstruct_game_json, stint_schema_json, ApiError, ReconcileFailure, ReconstructRequest,
    ReconstructResponse, RejectedEvent, RotationInput, TeamResponse, SCHEMA_VERSION,
};
