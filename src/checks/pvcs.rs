use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use kube::api::ListParams;
use kube::Client;

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::{NamespaceScope, Verdict};

/// List persistent volume claims in scope and report those not Bound.
pub async fn check_pvcs(
    client: Client,
    scope: NamespaceScope,
    sink: ReportSink,
) -> Result<usize, ScanError> {
    let pvcs = scope
        .api::<PersistentVolumeClaim>(&client)
        .list(&ListParams::default())
        .await?;
    Ok(report_pvcs(&pvcs.items, &sink))
}

/// Print one line per unhealthy claim and return the bad-count.
pub fn report_pvcs(pvcs: &[PersistentVolumeClaim], sink: &ReportSink) -> usize {
    let mut bad = 0;
    for pvc in pvcs {
        let name = match pvc.metadata.name.as_ref() {
            Some(n) => n,
            None => continue,
        };
        if let Verdict::Unhealthy(reason) = pvc_verdict(pvc) {
            bad += 1;
            let namespace = pvc.metadata.namespace.as_deref().unwrap_or("");
            sink.line(format!(
                "  {:<50} {}",
                format!("{}/{}", namespace, name),
                reason
            ));
        }
    }
    bad
}

/// Classify one claim from its phase. Anything but Bound is a problem;
/// unknown phases are reported verbatim.
pub fn pvc_verdict(pvc: &PersistentVolumeClaim) -> Verdict {
    let phase = pvc
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .unwrap_or("");
    match phase {
        "Bound" => Verdict::Healthy,
        "Pending" => Verdict::unhealthy("Pending"),
        "Lost" => Verdict::unhealthy("Lost"),
        other => Verdict::unhealthy(other),
    }
}
