use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Standard JSON envelope returned by every endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data: Some(data), error: None }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), data: Some(data), error: None }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), data: None, error: None }
    }
}

/// Pagination block appended to list responses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current: u64,
    pub pages: u64,
    pub total: u64,
}

/// Envelope for list endpoints: data plus pagination.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, pagination: PageInfo) -> Self {
        Self { success: true, data, pagination }
    }
}
