use std::future::Future;

use kube::Client;
use tracing::info;

use crate::checks;
use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::fallback::check_with_fallback;
use crate::report::{ReportSink, ScanReport};
use crate::types::{NamespaceScope, ResourceKind};

/// Drives one scan: runs every configured check in order and prints the
/// sections and final tally to the sink.
pub struct ClusterScanner<'a> {
    client: &'a Client,
    config: &'a ScanConfig,
}

impl<'a> ClusterScanner<'a> {
    pub fn new(client: &'a Client, config: &'a ScanConfig) -> Self {
        Self { client, config }
    }

    pub async fn scan(&self, sink: &ReportSink) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::new();
        for kind in &self.config.kinds {
            info!("checking {}", kind);
            sink.line(format!("\n=== {} ===", kind.title()));
            let bad = match kind {
                // Nodes are cluster-scoped; no namespace fallback applies.
                ResourceKind::Nodes => {
                    checks::nodes::check_nodes(self.client, sink, &self.config.node_group_labels)
                        .await?
                }
                ResourceKind::Deployments => {
                    self.check_namespaced(sink, checks::deployments::check_deployments)
                        .await?
                }
                ResourceKind::Pods => self.check_namespaced(sink, checks::pods::check_pods).await?,
                ResourceKind::PersistentVolumeClaims => {
                    self.check_namespaced(sink, checks::pvcs::check_pvcs).await?
                }
                ResourceKind::ReplicaSets => {
                    self.check_namespaced(sink, checks::replicasets::check_replicasets)
                        .await?
                }
                ResourceKind::Services => {
                    self.check_namespaced(sink, checks::services::check_services)
                        .await?
                }
            };
            report.add_section(*kind, bad);
        }
        sink.line(format!("\n{} issue(s) found", report.total_issues()));
        Ok(report)
    }

    async fn check_namespaced<F, Fut>(&self, sink: &ReportSink, check: F) -> Result<usize, ScanError>
    where
        F: Fn(Client, NamespaceScope, ReportSink) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<usize, ScanError>> + Send + 'static,
    {
        let client = self.client.clone();
        check_with_fallback(self.client, &self.config.scope, sink, move |scope, sink| {
            check(client.clone(), scope, sink)
        })
        .await
    }
}
