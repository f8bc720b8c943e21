use k8s_openapi::api::apps::v1::Deployment;
use kube::api::ListParams;
use kube::Client;

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::{NamespaceScope, Verdict};

/// List deployments in scope and report those with unavailable replicas.
pub async fn check_deployments(
    client: Client,
    scope: NamespaceScope,
    sink: ReportSink,
) -> Result<usize, ScanError> {
    let deployments = scope
        .api::<Deployment>(&client)
        .list(&ListParams::default())
        .await?;
    Ok(report_deployments(&deployments.items, &sink))
}

/// Print one line per unhealthy deployment and return the bad-count.
pub fn report_deployments(deployments: &[Deployment], sink: &ReportSink) -> usize {
    let mut bad = 0;
    for deployment in deployments {
        let name = match deployment.metadata.name.as_ref() {
            Some(n) => n,
            None => continue,
        };
        if let Verdict::Unhealthy(reason) = deployment_verdict(deployment) {
            bad += 1;
            let namespace = deployment.metadata.namespace.as_deref().unwrap_or("");
            sink.line(format!(
                "  {:<50} {}",
                format!("{}/{}", namespace, name),
                reason
            ));
        }
    }
    bad
}

/// Classify one deployment from its replica counts. An unspecified desired
/// count means 1, matching the API default.
pub fn deployment_verdict(deployment: &Deployment) -> Verdict {
    let desired = deployment.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let available = deployment
        .status
        .as_ref()
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);
    let unavailable = deployment
        .status
        .as_ref()
        .and_then(|s| s.unavailable_replicas)
        .unwrap_or(0);

    if unavailable > 0 || available < desired {
        Verdict::Unhealthy(format!(
            "{}/{} available, {} unavailable",
            available, desired, unavailable
        ))
    } else {
        Verdict::Healthy
    }
}
