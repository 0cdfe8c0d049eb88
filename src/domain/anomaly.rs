//! Anomalies flagged by the detection pipeline and their review workflow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::{AnomalyId, TransactionId};
use super::transaction::null_as_default;

/// Review status of an anomaly.
///
/// Decoding is lenient: unknown wire values read as `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AnomalyStatus {
    #[default]
    Pending,
    Investigating,
    Confirmed,
    FalsePositive,
}

impl AnomalyStatus {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Investigating,
        Self::Confirmed,
        Self::FalsePositive,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Investigating => "investigating",
            Self::Confirmed => "confirmed",
            Self::FalsePositive => "false_positive",
        }
    }
}

impl fmt::Display for AnomalyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AnomalyStatus {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for AnomalyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown status '{s}' (expected pending, investigating, confirmed or false_positive)")
            })
    }
}

/// Status filter for anomaly listings. `All` is sent as `status=all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AnomalyStatus),
}

impl StatusFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }

    #[must_use]
    pub fn matches(self, status: AnomalyStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Risk band of an anomaly score on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 81.0 {
            Self::Critical
        } else if score >= 61.0 {
            Self::High
        } else if score >= 31.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// A transaction the backend flagged as anomalous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: AnomalyId,
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anomaly_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AnomalyStatus,
    #[serde(default)]
    pub detection_method: Option<String>,
    #[serde(default, alias = "detected_at", alias = "timestamp")]
    pub created_at: Option<String>,
}

impl Anomaly {
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.anomaly_score)
    }
}

/// Set the status of the anomaly with `id`, leaving every other record untouched.
///
/// Returns `false` when no record has that id.
pub fn apply_status_update(
    anomalies: &mut [Anomaly],
    id: &AnomalyId,
    status: AnomalyStatus,
) -> bool {
    match anomalies.iter_mut().find(|a| &a.id == id) {
        Some(anomaly) => {
            anomaly.status = status;
            true
        }
        None => false,
    }
}

/// Count anomalies per detection method, in first-seen order.
///
/// Method names are capitalized; records without a method count as `Unknown`.
#[must_use]
pub fn detection_method_counts(anomalies: &[Anomaly]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for anomaly in anomalies {
        let method = capitalize(anomaly.detection_method.as_deref().unwrap_or("unknown"));
        match counts.iter_mut().find(|(name, _)| *name == method) {
            Some((_, count)) => *count += 1,
            None => counts.push((method, 1)),
        }
    }
    counts
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomaly(id: &str, status: AnomalyStatus, method: Option<&str>) -> Anomaly {
        Anomaly {
            id: AnomalyId::new(id),
            transaction_id: None,
            anomaly_score: 50.0,
            status,
            detection_method: method.map(str::to_string),
            created_at: None,
        }
    }

    #[test]
    fn status_round_trips_wire_names() {
        for status in AnomalyStatus::ALL {
            assert_eq!(status.as_str().parse::<AnomalyStatus>().unwrap(), status);
        }
        assert_eq!(
            "false-positive".parse::<AnomalyStatus>().unwrap(),
            AnomalyStatus::FalsePositive
        );
        assert!("closed".parse::<AnomalyStatus>().is_err());
    }

    #[test]
    fn null_or_unknown_status_decodes_as_pending() {
        let null: Anomaly = serde_json::from_str(r#"{"id":1,"status":null}"#).unwrap();
        assert_eq!(null.status, AnomalyStatus::Pending);

        let unknown: Anomaly = serde_json::from_str(r#"{"id":2,"status":"weird"}"#).unwrap();
        assert_eq!(unknown.status, AnomalyStatus::Pending);

        let known: Anomaly = serde_json::from_str(r#"{"id":3,"status":"false_positive"}"#).unwrap();
        assert_eq!(known.status, AnomalyStatus::FalsePositive);
        assert_eq!(
            serde_json::to_string(&known.status).unwrap(),
            r#""false_positive""#
        );
    }

    #[test]
    fn status_filter_parses_all_and_single() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "confirmed".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(AnomalyStatus::Confirmed)
        );
        assert!(StatusFilter::All.matches(AnomalyStatus::Pending));
        assert!(!StatusFilter::Only(AnomalyStatus::Confirmed).matches(AnomalyStatus::Pending));
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(31.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(61.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80.99), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(81.0), RiskLevel::Critical);
    }

    #[test]
    fn status_update_touches_only_matching_record() {
        let mut list = vec![
            anomaly("1", AnomalyStatus::Pending, None),
            anomaly("2", AnomalyStatus::Pending, None),
            anomaly("3", AnomalyStatus::Investigating, None),
        ];
        let before = list.clone();

        assert!(apply_status_update(&mut list, &AnomalyId::new("2"), AnomalyStatus::Confirmed));

        assert_eq!(list[1].status, AnomalyStatus::Confirmed);
        assert_eq!(list[0], before[0]);
        assert_eq!(list[2], before[2]);
    }

    #[test]
    fn status_update_unknown_id_changes_nothing() {
        let mut list = vec![anomaly("1", AnomalyStatus::Pending, None)];
        let before = list.clone();

        assert!(!apply_status_update(&mut list, &AnomalyId::new("9"), AnomalyStatus::Confirmed));
        assert_eq!(list, before);
    }

    #[test]
    fn method_counts_capitalize_and_default_unknown() {
        let list = vec![
            anomaly("1", AnomalyStatus::Pending, Some("statistical")),
            anomaly("2", AnomalyStatus::Pending, Some("ml")),
            anomaly("3", AnomalyStatus::Pending, Some("statistical")),
            anomaly("4", AnomalyStatus::Pending, None),
        ];

        assert_eq!(
            detection_method_counts(&list),
            vec![
                ("Statistical".to_string(), 2),
                ("Ml".to_string(), 1),
                ("Unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn decodes_backend_anomaly() {
        let json = r#"{
            "id": 12,
            "transaction_id": "TX123",
            "anomaly_score": 87.5,
            "status": "investigating",
            "detection_method": "network",
            "detected_at": "2024-05-01T00:00:00"
        }"#;
        let a: Anomaly = serde_json::from_str(json).unwrap();

        assert_eq!(a.id.as_str(), "12");
        assert_eq!(a.status, AnomalyStatus::Investigating);
        assert_eq!(a.risk_level(), RiskLevel::Critical);
        assert_eq!(a.created_at.as_deref(), Some("2024-05-01T00:00:00"));
    }
}
