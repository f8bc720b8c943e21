use anyhow::Result;
use kube::Client;

/// Connect using the standard kubeconfig / in-cluster resolution chain.
pub async fn connect() -> Result<Client> {
    Ok(Client::try_default().await?)
}

/// The server's reported version, e.g. "v1.26.3".
pub async fn server_version(client: &Client) -> Result<String> {
    let info = client.apiserver_version().await?;
    Ok(info.git_version)
}
