use std::collections::HashMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::{
    ContainerState, ContainerStateWaiting, ContainerStatus, Node, Pod, PodStatus, Service,
    ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use kubectl_bad::checks::nodes::report_nodes;
use kubectl_bad::checks::pods::report_pods;
use kubectl_bad::{
    endpoint_verdict, pod_verdict, run_with_fallback, service_needs_endpoints, MemoryWriter,
    NamespaceScope, ReportSink, ResourceKind, ScanError, ScanReport, Verdict,
    DEFAULT_NODE_GROUP_LABELS,
};

fn crashloop_pod(name: &str, namespace: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        status: Some(PodStatus {
            phase: Some("Running".to_string()),
            container_statuses: Some(vec![ContainerStatus {
                name: "main".to_string(),
                state: Some(ContainerState {
                    waiting: Some(ContainerStateWaiting {
                        reason: Some("CrashLoopBackOff".to_string()),
                        message: Some("back-off 5m0s restarting failed container".to_string()),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn healthy_pod(name: &str, namespace: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        status: Some(PodStatus {
            phase: Some("Running".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_crashloop_pod_is_reported_with_reason() {
    // Scenario A: one crashlooping pod yields one line and a bad-count of 1.
    let pods = vec![
        crashloop_pod("api-1", "prod"),
        healthy_pod("api-2", "prod"),
    ];
    let writer = MemoryWriter::new();
    let bad = report_pods(&pods, &writer.sink());

    assert_eq!(bad, 1);
    let output = writer.contents();
    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("prod/api-1"));
    assert!(output.contains("CrashLoopBackOff"));
}

#[test]
fn test_node_without_ready_condition_lands_in_ungrouped() {
    // Scenario B: a node with no Ready condition at all.
    let node = Node {
        metadata: ObjectMeta {
            name: Some("node-1".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let labels: Vec<String> = DEFAULT_NODE_GROUP_LABELS
        .iter()
        .map(|s| s.to_string())
        .collect();

    let writer = MemoryWriter::new();
    let bad = report_nodes(&[node], &labels, &writer.sink());

    assert_eq!(bad, 1);
    let output = writer.contents();
    assert!(output.contains("[(ungrouped)] (1 node(s))"));
    assert!(output.contains("NotReady (no condition)"));
}

type CheckFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<usize, ScanError>> + Send>>;

fn pods_check(
    by_namespace: Arc<HashMap<String, Vec<Pod>>>,
) -> impl Clone + Send + Sync + 'static + Fn(NamespaceScope, ReportSink) -> CheckFuture {
    move |scope, sink| {
        let by_namespace = Arc::clone(&by_namespace);
        Box::pin(async move {
            match scope {
                NamespaceScope::All => Err(ScanError::Forbidden(
                    "pods is forbidden: cannot list resource \"pods\" at the cluster scope"
                        .to_string(),
                )),
                NamespaceScope::Namespace(ns) if ns == "locked" => Err(ScanError::Forbidden(
                    format!("pods is forbidden in namespace {:?}", ns),
                )),
                NamespaceScope::Namespace(ns) => {
                    let pods = by_namespace.get(&ns).cloned().unwrap_or_default();
                    Ok(report_pods(&pods, &sink))
                }
            }
        })
    }
}

fn scenario_namespaces() -> Arc<HashMap<String, Vec<Pod>>> {
    let mut by_namespace = HashMap::new();
    by_namespace.insert("team-a".to_string(), vec![crashloop_pod("a-1", "team-a")]);
    by_namespace.insert(
        "team-b".to_string(),
        vec![
            crashloop_pod("b-1", "team-b"),
            crashloop_pod("b-2", "team-b"),
            healthy_pod("b-3", "team-b"),
        ],
    );
    Arc::new(by_namespace)
}

#[tokio::test]
async fn test_forbidden_cluster_wide_falls_back_and_merges_partial_results() {
    // Scenario C: direct listing denied, three namespaces enumerated, one
    // of them inaccessible. The accessible counts still add up.
    let writer = MemoryWriter::new();
    let total = run_with_fallback(
        || async {
            Ok::<_, ScanError>(vec![
                "team-a".to_string(),
                "team-b".to_string(),
                "locked".to_string(),
            ])
        },
        &NamespaceScope::All,
        &writer.sink(),
        pods_check(scenario_namespaces()),
    )
    .await
    .unwrap();

    assert_eq!(total, 3);
    let output = writer.contents();
    assert!(output.contains("(cluster-wide access denied, falling back to per-namespace queries)"));
    assert!(output.contains("WARNING: cannot access namespace \"locked\" (forbidden)"));
    assert!(output.contains("team-a/a-1"));
    assert!(output.contains("team-b/b-1"));
    assert!(output.contains("team-b/b-2"));
    assert!(!output.contains("b-3"));
}

#[tokio::test]
async fn test_fallback_totals_are_deterministic_across_runs() {
    // Line order across namespaces may vary; the total may not.
    let mut totals = Vec::new();
    for _ in 0..5 {
        let writer = MemoryWriter::new();
        let total = run_with_fallback(
            || async {
                Ok::<_, ScanError>(vec![
                    "team-a".to_string(),
                    "team-b".to_string(),
                    "locked".to_string(),
                ])
            },
            &NamespaceScope::All,
            &writer.sink(),
            pods_check(scenario_namespaces()),
        )
        .await
        .unwrap();
        totals.push(total);
    }
    assert!(totals.iter().all(|t| *t == 3));
}

#[test]
fn test_external_name_service_is_never_reported() {
    // Scenario D: ExternalName services are screened out before any
    // endpoint data is consulted.
    let service = Service {
        metadata: ObjectMeta {
            name: Some("upstream".to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("ExternalName".to_string()),
            external_name: Some("db.example.com".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(!service_needs_endpoints(&service));
    // Without the screen, zero endpoints would have been a finding.
    assert!(endpoint_verdict(0, 0).is_unhealthy());
}

#[test]
fn test_classifiers_are_deterministic() {
    let pod = crashloop_pod("api-1", "prod");
    let first = pod_verdict(&pod);
    for _ in 0..10 {
        assert_eq!(pod_verdict(&pod), first);
    }
    assert_eq!(first, Verdict::unhealthy("CrashLoopBackOff"));
}

#[test]
fn test_grand_total_equals_sum_of_sections() {
    let mut report = ScanReport::new();
    report.add_section(ResourceKind::Deployments, 2);
    report.add_section(ResourceKind::Pods, 3);
    report.add_section(ResourceKind::Services, 0);

    let sum: usize = report.sections().iter().map(|(_, bad)| bad).sum();
    assert_eq!(report.total_issues(), sum);
    assert_eq!(report.total_issues(), 5);
}
