use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::subscription::SubscriptionWeight;

/// Snapshot of an agent's subscriptions, published to the swarm for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitRep {
    /// Seconds since the unix epoch at which the report was produced.
    pub datatime: u64,
    pub ident: String,
    pub subscriptions: Vec<SubscriptionWeight>,
}

impl SitRep {
    pub fn new(ident: String, subscriptions: Vec<SubscriptionWeight>) -> Self {
        let datatime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or_default();
        Self {
            datatime,
            ident,
            subscriptions,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
