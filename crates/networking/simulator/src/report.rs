use serde::Serialize;
use swarm_agent::status_report::SitRep;
use tracing::info;

use crate::behaviour::NodeBehaviour;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub rounds: u64,
    pub blocks_minted: u64,
    pub nodes: Vec<NodeReport>,
    pub karma_by_behaviour: Vec<BehaviourKarma>,
}

impl SimulationReport {
    pub fn mean_karma(&self, behaviour: NodeBehaviour) -> Option<f64> {
        self.karma_by_behaviour
            .iter()
            .find(|class| class.behaviour == behaviour)
            .and_then(|class| class.mean_karma)
    }

    pub fn log_summary(&self) {
        for class in &self.karma_by_behaviour {
            info!(
                rounds = self.rounds,
                behaviour = %class.behaviour,
                nodes = class.nodes,
                samples = class.samples,
                mean_karma = ?class.mean_karma,
                "Simulation summary"
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub address: String,
    pub behaviour: NodeBehaviour,
    pub blocks: u64,
    pub known_peers: usize,
    pub status_report: SitRep,
}

/// Karma honest nodes hold for one class of nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviourKarma {
    pub behaviour: NodeBehaviour,
    pub nodes: usize,
    /// Number of (observer, target) pairs with a belief.
    pub samples: usize,
    /// `None` when no honest node has met a node of this class.
    pub mean_karma: Option<f64>,
}
