// Per-kind health checks
pub mod deployments;
pub mod nodes;
pub mod pods;
pub mod pvcs;
pub mod replicasets;
pub mod services;

// Re-export the pure classifiers
pub use deployments::deployment_verdict;
pub use nodes::{node_group, node_verdict};
pub use pods::pod_verdict;
pub use pvcs::pvc_verdict;
pub use replicasets::replicaset_verdict;
pub use services::{count_ready_addresses, endpoint_verdict, service_needs_endpoints};
