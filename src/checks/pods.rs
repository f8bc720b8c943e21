use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use kube::api::ListParams;
use kube::Client;

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::{NamespaceScope, Verdict};

/// Container waiting reasons that mean the pod is stuck rather than
/// starting up.
const PROBLEM_WAITING_REASONS: [&str; 6] = [
    "CrashLoopBackOff",
    "ImagePullBackOff",
    "ErrImagePull",
    "CreateContainerConfigError",
    "InvalidImageName",
    "CreateContainerError",
];

/// List pods in scope and report those not running successfully.
pub async fn check_pods(
    client: Client,
    scope: NamespaceScope,
    sink: ReportSink,
) -> Result<usize, ScanError> {
    let pods = scope.api::<Pod>(&client).list(&ListParams::default()).await?;
    Ok(report_pods(&pods.items, &sink))
}

/// Print one line per unhealthy pod and return the bad-count.
pub fn report_pods(pods: &[Pod], sink: &ReportSink) -> usize {
    let mut bad = 0;
    for pod in pods {
        let name = match pod.metadata.name.as_ref() {
            Some(n) => n,
            None => continue,
        };
        if let Verdict::Unhealthy(reason) = pod_verdict(pod) {
            bad += 1;
            let namespace = pod.metadata.namespace.as_deref().unwrap_or("");
            let phase = pod
                .status
                .as_ref()
                .and_then(|s| s.phase.as_deref())
                .unwrap_or("");
            sink.line(format!(
                "  {:<50} {:<12} {}",
                format!("{}/{}", namespace, name),
                phase,
                reason
            ));
        }
    }
    bad
}

/// Classify one pod from its reported status.
pub fn pod_verdict(pod: &Pod) -> Verdict {
    let status = match pod.status.as_ref() {
        Some(s) => s,
        None => return Verdict::Healthy,
    };
    let phase = status.phase.as_deref().unwrap_or("");

    // Succeeded pods (e.g. completed Jobs) are fine.
    if phase == "Succeeded" {
        return Verdict::Healthy;
    }

    // Init containers first, then regular containers; the first problem
    // found wins.
    let statuses = status
        .init_container_statuses
        .iter()
        .flatten()
        .chain(status.container_statuses.iter().flatten());
    for cs in statuses {
        if let Some(reason) = container_problem(cs) {
            return Verdict::Unhealthy(reason);
        }
    }

    match phase {
        "Failed" => {
            let reason = status
                .reason
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "Failed".to_string());
            Verdict::Unhealthy(reason)
        }
        "Pending" => {
            for condition in status.conditions.iter().flatten() {
                if condition.type_ == "PodScheduled" && condition.status == "False" {
                    return Verdict::Unhealthy(format!(
                        "Unschedulable: {}",
                        condition.message.as_deref().unwrap_or("")
                    ));
                }
            }
            Verdict::unhealthy("Pending")
        }
        "Unknown" => Verdict::unhealthy("Unknown"),
        _ => Verdict::Healthy,
    }
}

fn container_problem(cs: &ContainerStatus) -> Option<String> {
    let state = cs.state.as_ref()?;
    if let Some(waiting) = state.waiting.as_ref() {
        if let Some(reason) = waiting.reason.as_deref() {
            if PROBLEM_WAITING_REASONS.contains(&reason) {
                return Some(reason.to_string());
            }
        }
    }
    if let Some(terminated) = state.terminated.as_ref() {
        if terminated.exit_code != 0 {
            let reason = terminated
                .reason
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| format!("exit {}", terminated.exit_code));
            return Some(reason);
        }
    }
    None
}
