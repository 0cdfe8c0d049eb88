//! REST request bodies.

use serde::Serialize;

use crate::domain::AnomalyStatus;

/// Body of `PUT /anomalies/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdateRequest {
    pub status: AnomalyStatus,
}

impl StatusUpdateRequest {
    #[must_use]
    pub const fn new(status: AnomalyStatus) -> Self {
        Self { status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case_status() {
        let body = StatusUpdateRequest::new(AnomalyStatus::FalsePositive);
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"false_positive"}"#
        );
    }
}
