use thiserror::Error;

/// Errors that can occur while scanning the cluster.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The API server rejected the request for lack of permissions.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("kubernetes api request failed: {0}")]
    Api(#[source] kube::Error),

    #[error("listing namespaces: {0}")]
    NamespaceList(#[source] Box<ScanError>),

    #[error("namespace check task panicked")]
    TaskPanicked(#[source] tokio::task::JoinError),

    #[error("internal error: namespace semaphore unexpectedly closed")]
    SemaphoreClosed,
}

impl ScanError {
    /// True if this error represents an RBAC denial.
    ///
    /// Structured 403 responses are classified at conversion time; the
    /// substring check remains as a last resort for errors that only
    /// preserve the server's message text.
    pub fn is_forbidden(&self) -> bool {
        match self {
            ScanError::Forbidden(_) => true,
            ScanError::Api(err) => {
                let text = err.to_string();
                text.contains("forbidden") || text.contains("Forbidden")
            }
            _ => false,
        }
    }
}

impl From<kube::Error> for ScanError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 403 || resp.reason == "Forbidden" => {
                ScanError::Forbidden(resp.message)
            }
            other => ScanError::Api(other),
        }
    }
}
