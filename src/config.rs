use anyhow::{anyhow, Result};

use crate::types::{NamespaceScope, ResourceKind};

/// Node-group label keys checked in order across managed Kubernetes
/// providers; the first key with a non-empty value wins.
pub const DEFAULT_NODE_GROUP_LABELS: [&str; 7] = [
    "eks.amazonaws.com/nodegroup",      // EKS managed
    "karpenter.sh/nodepool",            // Karpenter
    "cloud.google.com/gke-nodepool",    // GKE
    "agentpool",                        // AKS
    "node.kubernetes.io/instance-type", // fallback: instance type
    "kubernetes.azure.com/agentpool",   // AKS (alternative)
    "alpha.eksctl.io/nodegroup-name",   // eksctl
];

/// Resolved configuration for one scan invocation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub kinds: Vec<ResourceKind>,
    pub scope: NamespaceScope,
    pub node_group_labels: Vec<String>,
}

impl ScanConfig {
    pub fn new(kinds: Vec<ResourceKind>, scope: NamespaceScope) -> Self {
        Self {
            kinds,
            scope,
            node_group_labels: DEFAULT_NODE_GROUP_LABELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Resolve positional resource-type words into the kinds to check.
///
/// An empty list or the word "all" selects every known kind. Words are
/// case-insensitive; duplicates collapse while preserving first-seen order.
pub fn resolve_kinds(words: &[String]) -> Result<Vec<ResourceKind>> {
    if words.is_empty() {
        return Ok(ResourceKind::ALL.to_vec());
    }

    let mut kinds = Vec::new();
    for word in words {
        let word = word.to_lowercase();
        if word == "all" {
            return Ok(ResourceKind::ALL.to_vec());
        }
        let kind = ResourceKind::parse(&word).ok_or_else(|| {
            anyhow!(
                "unknown resource type {:?} (valid: {})",
                word,
                ResourceKind::ALL.map(|k| k.arg()).join(", ")
            )
        })?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}
