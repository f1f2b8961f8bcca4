use eidos_bridge::BridgeError;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("unsupported media kind (content type {0:?})")]
    UnsupportedMediaKind(String),

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("no asset selected")]
    NoAsset,

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("job failed: {0}")]
    JobFailed(String),
}
