use std::fmt;

use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource};

/// Health classification of a single resource instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    Unhealthy(String),
}

impl Verdict {
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Verdict::Unhealthy(reason.into())
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Verdict::Unhealthy(_))
    }

    /// The reason string, if unhealthy.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Healthy => None,
            Verdict::Unhealthy(reason) => Some(reason),
        }
    }
}

/// Where a namespaced listing should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    /// List across all namespaces the caller can see.
    All,
    /// List within a single namespace.
    Namespace(String),
}

impl NamespaceScope {
    /// Build a typed API handle matching this scope.
    pub fn api<K>(&self, client: &Client) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match self {
            NamespaceScope::All => Api::all(client.clone()),
            NamespaceScope::Namespace(ns) => Api::namespaced(client.clone(), ns),
        }
    }
}

impl fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceScope::All => write!(f, "all namespaces"),
            NamespaceScope::Namespace(ns) => write!(f, "{}", ns),
        }
    }
}

/// Result of checking one namespace during the per-namespace fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceOutcome {
    /// The namespace was checked; this many bad resources were found.
    Counted(usize),
    /// The namespace itself was not accessible.
    Forbidden,
    /// The check failed for some other reason.
    Failed(String),
}

/// The resource kinds the scanner knows how to check, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Deployments,
    Nodes,
    Pods,
    PersistentVolumeClaims,
    ReplicaSets,
    Services,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Deployments,
        ResourceKind::Nodes,
        ResourceKind::Pods,
        ResourceKind::PersistentVolumeClaims,
        ResourceKind::ReplicaSets,
        ResourceKind::Services,
    ];

    /// The word accepted on the command line for this kind.
    pub fn arg(&self) -> &'static str {
        match self {
            ResourceKind::Deployments => "deployments",
            ResourceKind::Nodes => "nodes",
            ResourceKind::Pods => "pods",
            ResourceKind::PersistentVolumeClaims => "pvcs",
            ResourceKind::ReplicaSets => "replicasets",
            ResourceKind::Services => "services",
        }
    }

    /// The section title printed above this kind's findings.
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Deployments => "Deployments",
            ResourceKind::Nodes => "Nodes",
            ResourceKind::Pods => "Pods",
            ResourceKind::PersistentVolumeClaims => "PersistentVolumeClaims",
            ResourceKind::ReplicaSets => "ReplicaSets",
            ResourceKind::Services => "Services",
        }
    }

    pub fn parse(word: &str) -> Option<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.arg() == word)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arg())
    }
}
