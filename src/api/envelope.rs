//! Uniform response body: `{success, data?, error?}`

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Wrap `data` in a success envelope
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Body of a delete response; `deleted` is false when the id was unknown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub id: String,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("not found")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "not found"}));
    }

    #[test]
    fn test_success_omits_error() {
        let json = serde_json::to_value(ApiResponse::ok(DeleteResult {
            id: "cli-1".to_string(),
            deleted: true,
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "data": {"id": "cli-1", "deleted": true}})
        );
    }

    #[test]
    fn test_error_envelope_parses_for_any_payload_type() {
        // No Default bound on the payload type
        #[derive(Debug, PartialEq, Deserialize)]
        struct Record {
            id: String,
        }

        let body = br#"{"success": false, "error": "not found"}"#;
        let envelope: ApiResponse<Record> = serde_json::from_slice(body).unwrap();
        assert_eq!(envelope, ApiResponse::failure("not found"));

        let body = br#"{"success": true, "data": {"id": "cli-1"}}"#;
        let envelope: ApiResponse<Record> = serde_json::from_slice(body).unwrap();
        assert_eq!(envelope.data, Some(Record { id: "cli-1".to_string() }));
    }
}
