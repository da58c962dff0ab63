use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of a subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    /// The peer was already subscribed; only a keep-alive is due.
    Refreshed,
    /// The peer was added. `evicted` holds the lowest-karma peers dropped to stay within bounds,
    /// which may include the new peer itself.
    Subscribed { evicted: Vec<String> },
}

/// A subscribed peer together with its current karma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionWeight {
    pub peer: String,
    pub weight: f64,
}

/// Bounded set of subscribed peers, kept in ascending karma order as of the last insertion.
#[derive(Debug, Clone)]
pub struct SubscriptionSet {
    max_peers: usize,
    peers: Vec<String>,
}

impl SubscriptionSet {
    pub fn new(max_peers: usize) -> Self {
        Self {
            max_peers,
            peers: Vec::new(),
        }
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.peers.iter().any(|subscribed| subscribed == peer)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Subscribe to `peer`, then re-sort by `karma` and evict from the low end while over bounds.
    pub fn subscribe<F>(&mut self, peer: &str, karma: F) -> SubscriptionChange
    where
        F: Fn(&str) -> f64,
    {
        if self.contains(peer) {
            return SubscriptionChange::Refreshed;
        }

        self.peers.push(peer.to_string());

        let mut weighted: Vec<(f64, String)> = self
            .peers
            .drain(..)
            .map(|peer| (karma(&peer), peer))
            .collect();
        weighted.sort_by(|(left, _), (right, _)| left.total_cmp(right));
        self.peers = weighted.into_iter().map(|(_, peer)| peer).collect();

        let excess = self.peers.len().saturating_sub(self.max_peers);
        let evicted: Vec<String> = self.peers.drain(..excess).collect();
        if !evicted.is_empty() {
            debug!(?evicted, max_peers = self.max_peers, "Evicted lowest karma subscriptions");
        }

        SubscriptionChange::Subscribed { evicted }
    }

    /// Current karma of every subscribed peer, in subscription order.
    pub fn weights<F>(&self, karma: F) -> Vec<SubscriptionWeight>
    where
        F: Fn(&str) -> f64,
    {
        self.peers
            .iter()
            .map(|peer| SubscriptionWeight {
                peer: peer.clone(),
                weight: karma(peer),
            })
            .collect()
    }
}
