use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeerManagementError {
    #[error("Unknown outcome: {0}")]
    UnknownOutcome(String),

    #[error("No candidate peers to select from")]
    NoCandidates,
}
