use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Node;
use kube::api::ListParams;
use kube::{Api, Client};

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::Verdict;

/// List cluster nodes and report those not Ready, grouped by node group.
///
/// Nodes are cluster-scoped, so this check never participates in the
/// per-namespace fallback.
pub async fn check_nodes(
    client: &Client,
    sink: &ReportSink,
    group_labels: &[String],
) -> Result<usize, ScanError> {
    let nodes = Api::<Node>::all(client.clone())
        .list(&ListParams::default())
        .await?;
    Ok(report_nodes(&nodes.items, group_labels, sink))
}

/// Print unhealthy nodes grouped by node group and return the bad-count.
/// Groups are emitted in lexicographic order for stable output.
pub fn report_nodes(nodes: &[Node], group_labels: &[String], sink: &ReportSink) -> usize {
    let mut grouped: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for node in nodes {
        let name = match node.metadata.name.as_ref() {
            Some(n) => n,
            None => continue,
        };
        if let Verdict::Unhealthy(reason) = node_verdict(node) {
            grouped
                .entry(node_group(node, group_labels))
                .or_default()
                .push((name.clone(), reason));
        }
    }

    let mut bad = 0;
    for (group, members) in &grouped {
        bad += members.len();
        sink.line(format!("  [{}] ({} node(s))", group, members.len()));
        for (name, reason) in members {
            sink.line(format!("    {:<50} {}", name, reason));
        }
    }
    bad
}

/// Classify one node from its Ready condition.
pub fn node_verdict(node: &Node) -> Verdict {
    if let Some(conditions) = node.status.as_ref().and_then(|s| s.conditions.as_ref()) {
        for condition in conditions {
            if condition.type_ == "Ready" {
                if condition.status == "True" {
                    return Verdict::Healthy;
                }
                let mut reason = condition
                    .reason
                    .clone()
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| "NotReady".to_string());
                if let Some(message) = condition.message.as_deref().filter(|m| !m.is_empty()) {
                    reason = format!("{}: {}", reason, message);
                }
                return Verdict::Unhealthy(reason);
            }
        }
    }
    // No Ready condition at all.
    Verdict::unhealthy("NotReady (no condition)")
}

/// Resolve the node-group name from the configured label keys; the first
/// key with a non-empty value wins.
pub fn node_group(node: &Node, keys: &[String]) -> String {
    if let Some(labels) = node.metadata.labels.as_ref() {
        for key in keys {
            if let Some(value) = labels.get(key) {
                if !value.is_empty() {
                    return value.clone();
                }
            }
        }
    }
    "(ungrouped)".to_string()
}
