use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ListParams;
use kube::Client;

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::{NamespaceScope, Verdict};

/// List replicasets in scope and report orphaned or under-ready ones.
pub async fn check_replicasets(
    client: Client,
    scope: NamespaceScope,
    sink: ReportSink,
) -> Result<usize, ScanError> {
    let replicasets = scope
        .api::<ReplicaSet>(&client)
        .list(&ListParams::default())
        .await?;
    Ok(report_replicasets(&replicasets.items, &sink))
}

/// Print one line per unhealthy replicaset and return the bad-count.
pub fn report_replicasets(replicasets: &[ReplicaSet], sink: &ReportSink) -> usize {
    let mut bad = 0;
    for rs in replicasets {
        let name = match rs.metadata.name.as_ref() {
            Some(n) => n,
            None => continue,
        };
        if let Verdict::Unhealthy(reason) = replicaset_verdict(rs) {
            bad += 1;
            let namespace = rs.metadata.namespace.as_deref().unwrap_or("");
            sink.line(format!(
                "  {:<50} {}",
                format!("{}/{}", namespace, name),
                reason
            ));
        }
    }
    bad
}

/// Classify one replicaset from its replica counts and owner references.
pub fn replicaset_verdict(rs: &ReplicaSet) -> Verdict {
    // Scaled-to-zero replicasets are old rollout remnants.
    let desired = rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0);
    if desired == 0 {
        return Verdict::Healthy;
    }

    let ready = rs
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    let refs = rs.metadata.owner_references.as_deref().unwrap_or(&[]);

    if is_orphaned(refs) {
        return Verdict::Unhealthy(format!(
            "orphaned (owner deleted), {}/{} ready",
            ready, desired
        ));
    }

    // Under-replicated sets owned by a Deployment are already surfaced by
    // the deployment check; skip them to avoid double-reporting.
    if !has_controller_owner(refs, "Deployment") && ready < desired {
        return Verdict::Unhealthy(format!("{}/{} ready", ready, desired));
    }

    Verdict::Healthy
}

/// Owner references exist but none claims to be the controller, suggesting
/// the controlling owner was deleted.
fn is_orphaned(refs: &[OwnerReference]) -> bool {
    !refs.is_empty() && !refs.iter().any(|r| r.controller == Some(true))
}

fn has_controller_owner(refs: &[OwnerReference], kind: &str) -> bool {
    refs.iter()
        .any(|r| r.controller == Some(true) && r.kind == kind)
}
