// Public modules
pub mod checks;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod kubernetes;
pub mod report;
pub mod scanner;
pub mod types;

// Re-export commonly used items
pub use checks::{
    deployment_verdict, endpoint_verdict, node_group, node_verdict, pod_verdict, pvc_verdict,
    replicaset_verdict, service_needs_endpoints,
};
pub use config::{resolve_kinds, ScanConfig, DEFAULT_NODE_GROUP_LABELS};
pub use errors::ScanError;
pub use fallback::{check_with_fallback, run_with_fallback, MAX_PARALLEL_NAMESPACES};
pub use report::{MemoryWriter, ReportSink, ScanReport};
pub use scanner::ClusterScanner;
pub use types::{NamespaceOutcome, NamespaceScope, ResourceKind, Verdict};
