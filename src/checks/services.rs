use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::discovery::v1::EndpointSlice;
use kube::api::ListParams;
use kube::{Api, Client};

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::{NamespaceScope, Verdict};

/// List services in scope and report those without ready endpoints.
pub async fn check_services(
    client: Client,
    scope: NamespaceScope,
    sink: ReportSink,
) -> Result<usize, ScanError> {
    let services = scope
        .api::<Service>(&client)
        .list(&ListParams::default())
        .await?;

    let mut bad = 0;
    for service in &services.items {
        let name = match service.metadata.name.as_ref() {
            Some(n) => n,
            None => continue,
        };
        if !service_needs_endpoints(service) {
            continue;
        }
        let namespace = service.metadata.namespace.as_deref().unwrap_or("");

        // A failed lookup is a reportable signal, not an error: silence
        // here would hide a service that genuinely has nothing behind it.
        let verdict = match list_endpoint_slices(&client, namespace, name).await {
            Ok(slices) => {
                let (ready, not_ready) = count_ready_addresses(&slices);
                endpoint_verdict(ready, not_ready)
            }
            Err(_) => Verdict::unhealthy("no endpoints (error fetching)"),
        };

        if let Verdict::Unhealthy(reason) = verdict {
            bad += 1;
            sink.line(format!(
                "  {:<50} {}",
                format!("{}/{}", namespace, name),
                reason
            ));
        }
    }
    Ok(bad)
}

async fn list_endpoint_slices(
    client: &Client,
    namespace: &str,
    service: &str,
) -> Result<Vec<EndpointSlice>, ScanError> {
    let api: Api<EndpointSlice> = Api::namespaced(client.clone(), namespace);
    let params = ListParams::default().labels(&format!("kubernetes.io/service-name={}", service));
    Ok(api.list(&params).await?.items)
}

/// Whether this service is expected to have endpoints at all.
pub fn service_needs_endpoints(service: &Service) -> bool {
    if let Some(spec) = service.spec.as_ref() {
        // ExternalName services don't use endpoints.
        if spec.type_.as_deref() == Some("ExternalName") {
            return false;
        }
        // Headless services without a selector manage endpoints manually.
        if spec.cluster_ip.as_deref() == Some("None")
            && spec.selector.as_ref().map_or(true, |s| s.is_empty())
        {
            return false;
        }
    }
    true
}

/// Sum ready and not-ready addresses across all matching slices.
pub fn count_ready_addresses(slices: &[EndpointSlice]) -> (usize, usize) {
    let mut ready = 0;
    let mut not_ready = 0;
    for slice in slices {
        for endpoint in &slice.endpoints {
            if endpoint.conditions.as_ref().and_then(|c| c.ready) == Some(true) {
                ready += endpoint.addresses.len();
            } else {
                not_ready += endpoint.addresses.len();
            }
        }
    }
    (ready, not_ready)
}

/// Classify a service from its endpoint address counts.
pub fn endpoint_verdict(ready: usize, not_ready: usize) -> Verdict {
    if ready == 0 && not_ready == 0 {
        return Verdict::unhealthy("no endpoints");
    }
    if ready == 0 {
        return Verdict::Unhealthy(format!("0 ready endpoints ({} not ready)", not_ready));
    }
    Verdict::Healthy
}
