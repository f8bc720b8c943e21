use anyhow::Result;
use clap::Parser;
use tracing::info;

use kubectl_bad::config::{resolve_kinds, ScanConfig};
use kubectl_bad::kubernetes::{connect, server_version};
use kubectl_bad::report::ReportSink;
use kubectl_bad::scanner::ClusterScanner;
use kubectl_bad::types::NamespaceScope;

/// A kubectl plugin to find bad things in your cluster.
#[derive(Parser)]
#[command(name = "kubectl-bad", version, about)]
struct Cli {
    /// Resource types to check: pods, nodes, deployments, replicasets,
    /// services, pvcs. Pass "all" or nothing to check everything.
    resources: Vec<String>,

    /// If true, list across all namespaces
    #[arg(short = 'A', long)]
    all_namespaces: bool,

    /// Namespace to check. Defaults to the current kubeconfig namespace.
    #[arg(short, long)]
    namespace: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let kinds = resolve_kinds(&cli.resources)?;
    info!("kinds = {:?}", kinds);

    let client = connect().await?;
    println!("Connected to Kubernetes {}", server_version(&client).await?);

    let scope = if cli.all_namespaces {
        NamespaceScope::All
    } else {
        let namespace = cli
            .namespace
            .unwrap_or_else(|| client.default_namespace().to_string());
        NamespaceScope::Namespace(namespace)
    };
    println!("Namespace: {}", scope);

    let config = ScanConfig::new(kinds, scope);
    let sink = ReportSink::stdout();
    ClusterScanner::new(&client, &config).scan(&sink).await?;

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
