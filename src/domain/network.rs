//! Account/transaction network graph and its summary statistics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::lenient_string;
use super::transaction::null_as_default;

/// Accounts with a balance above this are "high value".
pub const HIGH_VALUE_BALANCE: f64 = 100_000.0;

/// Nodes with a risk score above this are "high risk".
pub const HIGH_RISK_SCORE: f64 = 80.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_suspicious: bool,
}

impl NetworkNode {
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    #[must_use]
    pub fn node_type(&self) -> &str {
        self.node_type.as_deref().unwrap_or("account")
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.label().to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
            || self.node_type().to_lowercase().contains(needle)
    }
}

/// A money flow between two accounts.
///
/// Endpoints are accepted under `source`/`source_id`/`from` and
/// `target`/`target_id`/`to`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    #[serde(default, alias = "source_id", alias = "from", deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(default, alias = "target_id", alias = "to", deserialize_with = "lenient_string")]
    pub target: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_anomaly: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anomaly_score: f64,
    #[serde(default)]
    pub transaction_type: Option<String>,
}

/// Which subset of the graph to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkView {
    #[default]
    All,
    /// Suspicious accounts and anomalous flows.
    Suspicious,
    /// High-risk accounts and anomalous flows.
    Anomalies,
    /// High-value accounts; all flows.
    HighValue,
}

impl FromStr for NetworkView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "all" => Ok(Self::All),
            "suspicious" => Ok(Self::Suspicious),
            "anomalies" | "high-risk" => Ok(Self::Anomalies),
            "high-value" | "high-balance" => Ok(Self::HighValue),
            other => Err(format!(
                "unknown view '{other}' (expected all, suspicious, anomalies or high-value)"
            )),
        }
    }
}

impl fmt::Display for NetworkView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Suspicious => "suspicious",
            Self::Anomalies => "anomalies",
            Self::HighValue => "high-value",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub suspicious_nodes: usize,
    pub anomalous_edges: usize,
    pub high_risk_nodes: usize,
    pub avg_risk_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGraph {
    #[serde(default)]
    pub nodes: Vec<NetworkNode>,
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
}

impl NetworkGraph {
    /// Drop nodes with blank ids and edges with a blank endpoint.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            nodes: self
                .nodes
                .into_iter()
                .filter(|n| !n.id.trim().is_empty())
                .collect(),
            edges: self
                .edges
                .into_iter()
                .filter(|e| !e.source.trim().is_empty() && !e.target.trim().is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> NetworkStats {
        let total_nodes = self.nodes.len();
        let avg_risk_score = if total_nodes == 0 {
            0.0
        } else {
            self.nodes.iter().map(|n| n.risk_score).sum::<f64>() / total_nodes as f64
        };

        NetworkStats {
            total_nodes,
            total_edges: self.edges.len(),
            suspicious_nodes: self.nodes.iter().filter(|n| n.is_suspicious).count(),
            anomalous_edges: self.edges.iter().filter(|e| e.is_anomaly).count(),
            high_risk_nodes: self
                .nodes
                .iter()
                .filter(|n| n.risk_score > HIGH_RISK_SCORE)
                .count(),
            avg_risk_score,
        }
    }

    /// Subset of the graph for `view`, with nodes narrowed by a
    /// case-insensitive search on label, id and type.
    #[must_use]
    pub fn filter(&self, view: NetworkView, search: Option<&str>) -> Self {
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let searched = self
            .nodes
            .iter()
            .filter(|n| needle.as_deref().map_or(true, |q| n.matches_search(q)));

        let nodes: Vec<NetworkNode> = match view {
            NetworkView::All => searched.cloned().collect(),
            NetworkView::Suspicious => searched.filter(|n| n.is_suspicious).cloned().collect(),
            NetworkView::Anomalies => searched
                .filter(|n| n.risk_score > HIGH_RISK_SCORE)
                .cloned()
                .collect(),
            NetworkView::HighValue => searched
                .filter(|n| n.balance > HIGH_VALUE_BALANCE)
                .cloned()
                .collect(),
        };

        let edges = match view {
            NetworkView::Suspicious | NetworkView::Anomalies => {
                self.edges.iter().filter(|e| e.is_anomaly).cloned().collect()
            }
            NetworkView::All | NetworkView::HighValue => self.edges.clone(),
        };

        Self { nodes, edges }.normalized()
    }
}
