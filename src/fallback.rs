use std::future::Future;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Namespace;
use kube::api::ListParams;
use kube::{Api, Client};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::errors::ScanError;
use crate::report::ReportSink;
use crate::types::{NamespaceOutcome, NamespaceScope};

/// Number of namespaces queried concurrently when falling back from a
/// cluster-wide list.
pub const MAX_PARALLEL_NAMESPACES: usize = 5;

/// Run `check` cluster-wide, degrading to per-namespace queries when the
/// cluster-wide list is forbidden. Namespace enumeration uses the given
/// client; see [`run_with_fallback`] for the injectable form.
pub async fn check_with_fallback<F, Fut>(
    client: &Client,
    scope: &NamespaceScope,
    sink: &ReportSink,
    check: F,
) -> Result<usize, ScanError>
where
    F: Fn(NamespaceScope, ReportSink) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<usize, ScanError>> + Send + 'static,
{
    let client = client.clone();
    run_with_fallback(
        move || list_namespace_names(client.clone()),
        scope,
        sink,
        check,
    )
    .await
}

/// The fallback orchestrator.
///
/// A pinned namespace is checked directly. Otherwise the cluster-wide
/// attempt is terminal on success or on any non-authorization error; a
/// denial switches to checking every enumerated namespace under a bounded
/// worker pool. Per-namespace failures are warned about and contribute
/// nothing; every accessible namespace's count reaches the returned total.
pub async fn run_with_fallback<N, NFut, F, Fut>(
    list_namespaces: N,
    scope: &NamespaceScope,
    sink: &ReportSink,
    check: F,
) -> Result<usize, ScanError>
where
    N: Fn() -> NFut,
    NFut: Future<Output = Result<Vec<String>, ScanError>>,
    F: Fn(NamespaceScope, ReportSink) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<usize, ScanError>> + Send + 'static,
{
    // A pinned namespace is queried directly; a denial there is the
    // caller's answer, not something to work around.
    if let NamespaceScope::Namespace(_) = scope {
        return check(scope.clone(), sink.clone()).await;
    }

    match check(NamespaceScope::All, sink.clone()).await {
        Ok(count) => return Ok(count),
        Err(err) if err.is_forbidden() => {
            debug!("cluster-wide list forbidden, degrading to per-namespace");
        }
        Err(err) => return Err(err),
    }

    sink.line("  (cluster-wide access denied, falling back to per-namespace queries)");

    let namespaces = list_namespaces()
        .await
        .map_err(|err| ScanError::NamespaceList(Box::new(err)))?;

    let semaphore = Arc::new(Semaphore::new(MAX_PARALLEL_NAMESPACES));
    let mut tasks: JoinSet<Result<(String, NamespaceOutcome), ScanError>> = JoinSet::new();
    for namespace in namespaces {
        let check = check.clone();
        let sink = sink.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|_| ScanError::SemaphoreClosed)?;
            let outcome = match check(NamespaceScope::Namespace(namespace.clone()), sink).await {
                Ok(count) => NamespaceOutcome::Counted(count),
                Err(err) if err.is_forbidden() => NamespaceOutcome::Forbidden,
                Err(err) => NamespaceOutcome::Failed(err.to_string()),
            };
            Ok((namespace, outcome))
        });
    }

    let mut total = 0;
    while let Some(joined) = tasks.join_next().await {
        let (namespace, outcome) = joined.map_err(ScanError::TaskPanicked)??;
        match outcome {
            NamespaceOutcome::Counted(count) => total += count,
            NamespaceOutcome::Forbidden => {
                sink.line(format!(
                    "  WARNING: cannot access namespace {:?} (forbidden)",
                    namespace
                ));
            }
            NamespaceOutcome::Failed(detail) => {
                sink.line(format!(
                    "  WARNING: error checking namespace {:?}: {}",
                    namespace, detail
                ));
            }
        }
    }
    Ok(total)
}

async fn list_namespace_names(client: Client) -> Result<Vec<String>, ScanError> {
    let namespaces = Api::<Namespace>::all(client)
        .list(&ListParams::default())
        .await?;
    Ok(namespaces
        .items
        .into_iter()
        .filter_map(|ns| ns.metadata.name)
        .collect())
}
