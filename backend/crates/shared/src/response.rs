//! Response Envelope
//!
//! Every API response body is wrapped as `{success, returnMessage, data}`.
//! Business failures travel in the same shape with `success = false`.

use serde::{Deserialize, Serialize};

/// Uniform response envelope
///
/// ## Examples
/// ```rust
/// use kernel::response::ServiceResponse;
///
/// let ok = ServiceResponse::success(42_i64, "User registered");
/// assert!(ok.success);
/// assert_eq!(ok.data, Some(42));
///
/// let failed: ServiceResponse<i64> = ServiceResponse::failure("User already exists");
/// assert!(!failed.success);
/// assert!(failed.data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub return_message: String,
    pub data: Option<T>,
}

impl<T> ServiceResponse<T> {
    /// Successful response carrying a payload
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            return_message: message.into(),
            data: Some(data),
        }
    }

    /// Failed response (reported, not thrown)
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            return_message: message.into(),
            data: None,
        }
    }

    /// Convert into `Result`, keeping the message on failure
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.return_message)
        }
    }
}

impl ServiceResponse<()> {
    /// Successful response without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            return_message: message.into(),
            data: None,
        }
    }
}
