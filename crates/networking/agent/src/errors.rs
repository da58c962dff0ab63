use swarm_peer_management::errors::PeerManagementError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Peer management error: {0}")]
    PeerManagement(#[from] PeerManagementError),

    #[error("Failed to serialize status report: {0}")]
    StatusReport(#[from] serde_json::Error),
}
