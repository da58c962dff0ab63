use std::fmt;

use serde::{Deserialize, Serialize};

/// How a simulated node treats the requests it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeBehaviour {
    /// Answers pings, serves its chain and supplies blocks.
    Honest,
    /// Like an honest node, but drops a fraction of requests.
    Flaky,
    /// Answers pings but only ever announces blocks it cannot supply.
    Malicious,
}

impl NodeBehaviour {
    pub const ALL: [NodeBehaviour; 3] = [
        NodeBehaviour::Honest,
        NodeBehaviour::Flaky,
        NodeBehaviour::Malicious,
    ];
}

impl fmt::Display for NodeBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeBehaviour::Honest => write!(f, "honest"),
            NodeBehaviour::Flaky => write!(f, "flaky"),
            NodeBehaviour::Malicious => write!(f, "malicious"),
        }
    }
}
