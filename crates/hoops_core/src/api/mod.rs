//! JSON bridge for host applications.

pub mod match_json;

pub use match_json::{
    close_match_session, create_match_json, match_command_json, match_snapshot_json,
    snapshot_schema_json, ApiResponse, CreateMatchRequest, MatchCommand,
};
