//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::auth::Claims;

/// Login request
///
/// `tokenId` is an identity token already validated upstream; it becomes
/// the subject of the issued pair.
#[derive(Debug, Deserialize, validator::Validate)]
pub struct LoginRequest {
    #[serde(rename = "tokenId")]
    #[validate(custom(function = "not_blank"))]
    pub token_id: String,
}

/// `/protected` response
#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: Claims,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
