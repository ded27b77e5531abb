use serde::{Deserialize, Serialize};

/// Body shape shared by every endpoint, successful or not.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_absent_fields() {
        let json = serde_json::to_value(ApiResponse::failure("nope", None)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "nope" }));
    }

    #[test]
    fn test_ok_with_empty_list_keeps_data() {
        let json = serde_json::to_value(ApiResponse::ok("No todos found", Vec::<u8>::new())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([]));
        assert!(json.get("errors").is_none());
    }
}
