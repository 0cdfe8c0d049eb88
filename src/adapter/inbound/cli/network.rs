//! Handler for the `network` command.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::NetworkArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::{NetworkGraph, NetworkNode, NetworkStats};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Account")]
    label: String,
    #[tabled(rename = "Type")]
    node_type: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl From<&NetworkNode> for NodeRow {
    fn from(node: &NetworkNode) -> Self {
        Self {
            label: node.label().to_string(),
            node_type: node.node_type().to_string(),
            balance: format!("{:.2}", node.balance),
            risk: format!("{:.1}", node.risk_score),
            flags: if node.is_suspicious {
                "suspicious".to_string()
            } else {
                String::new()
            },
        }
    }
}

/// Nodes ordered by risk score, highest first, at most `limit` of them.
fn riskiest(graph: &NetworkGraph, limit: usize) -> Vec<&NetworkNode> {
    let mut nodes: Vec<&NetworkNode> = graph.nodes.iter().collect();
    nodes.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
    });
    nodes.truncate(limit);
    nodes
}

/// Fetch the network graph, narrow it to the requested view and summarize.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn execute(config: &Config, args: &NetworkArgs) -> Result<()> {
    let api = factory::build_api(config)?;
    let fetcher = factory::build_fetcher(config, move |days: Option<u32>| {
        let api = Arc::clone(&api);
        async move { api.network_data(days).await }
    });
    let graph = fetcher.fetch(args.days).await?;

    let overall = graph.stats();
    let view = graph.filter(args.view, args.search.as_deref());
    let shown = view.stats();
    let top = riskiest(&view, args.top);

    if output::is_json() {
        output::json_output(json!({
            "command": "network",
            "view": args.view.to_string(),
            "search": args.search,
            "days": args.days,
            "stats": overall,
            "filtered": shown,
            "top_nodes": top,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("View", args.view);
    if let Some(search) = &args.search {
        output::field("Search", search);
    }
    if let Some(days) = args.days {
        output::field("Window", format!("last {days} days"));
    }

    display_stats("Network", &overall);
    if shown != overall {
        display_stats("Shown", &shown);
    }

    if top.is_empty() {
        println!();
        output::note("No accounts match this view.");
        return Ok(());
    }

    output::section("Highest risk accounts");
    let rows: Vec<NodeRow> = top.into_iter().map(NodeRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

fn display_stats(title: &str, stats: &NetworkStats) {
    output::section(title);
    output::field("Accounts", stats.total_nodes);
    output::field("Flows", stats.total_edges);
    output::field("Suspicious accounts", output::negative(stats.suspicious_nodes));
    output::field("Anomalous flows", output::negative(stats.anomalous_edges));
    output::field("High risk accounts", stats.high_risk_nodes);
    output::field("Avg risk score", format!("{:.1}", stats.avg_risk_score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, risk: f64) -> NetworkNode {
        NetworkNode {
            id: id.into(),
            risk_score: risk,
            ..NetworkNode::default()
        }
    }

    #[test]
    fn riskiest_orders_descending_and_truncates() {
        let graph = NetworkGraph {
            nodes: vec![node("a", 10.0), node("b", 95.0), node("c", 50.0)],
            edges: Vec::new(),
        };

        let top: Vec<&str> = riskiest(&graph, 2).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top, ["b", "c"]);
    }

    #[test]
    fn node_row_labels_suspicious_accounts() {
        let mut account = node("acct-1", 88.0);
        account.is_suspicious = true;
        let row = NodeRow::from(&account);

        assert_eq!(row.label, "acct-1");
        assert_eq!(row.node_type, "account");
        assert_eq!(row.risk, "88.0");
        assert_eq!(row.flags, "suspicious");
    }
}
