use std::{collections::HashMap, num::NonZeroUsize};

use lru::LruCache;
use tracing::trace;

use crate::{
    errors::PeerManagementError,
    karma::karma,
    outcome::{Comparison, OutcomeKind},
    rating::{Rating, RatingEnvironment},
};

#[derive(Debug)]
enum Beliefs {
    Unbounded(HashMap<String, Rating>),
    /// Forgets the least recently referenced peer once full.
    Bounded(LruCache<String, Rating>),
}

/// Per-peer reputation state, keyed by peer host (`"ip:port"`).
///
/// Entries are created lazily from the prior the first time a peer is referenced.
#[derive(Debug)]
pub struct BeliefStore {
    environment: RatingEnvironment,
    beliefs: Beliefs,
}

impl Default for BeliefStore {
    fn default() -> Self {
        Self::new(RatingEnvironment::default(), None)
    }
}

impl BeliefStore {
    /// Create a store. With `capacity` set, the store never holds more than that many peers.
    pub fn new(environment: RatingEnvironment, capacity: Option<NonZeroUsize>) -> Self {
        let beliefs = match capacity {
            Some(capacity) => Beliefs::Bounded(LruCache::new(capacity)),
            None => Beliefs::Unbounded(HashMap::new()),
        };
        Self {
            environment,
            beliefs,
        }
    }

    /// Current rating of a peer, or the prior if it was never referenced.
    pub fn rating(&self, peer: &str) -> Rating {
        let rating = match &self.beliefs {
            Beliefs::Unbounded(beliefs) => beliefs.get(peer),
            Beliefs::Bounded(beliefs) => beliefs.peek(peer),
        };
        rating.copied().unwrap_or_else(|| self.environment.prior())
    }

    pub fn karma(&self, peer: &str) -> f64 {
        karma(&self.rating(peer))
    }

    pub fn contains(&self, peer: &str) -> bool {
        match &self.beliefs {
            Beliefs::Unbounded(beliefs) => beliefs.contains_key(peer),
            Beliefs::Bounded(beliefs) => beliefs.contains(peer),
        }
    }

    pub fn len(&self) -> usize {
        match &self.beliefs {
            Beliefs::Unbounded(beliefs) => beliefs.len(),
            Beliefs::Bounded(beliefs) => beliefs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the rating of a peer.
    pub fn set_rating(&mut self, peer: &str, rating: Rating) {
        *self.entry(peer) = rating;
    }

    /// Apply the comparison `outcome` implies to the rating of `peer` and return the result.
    pub fn update_belief(&mut self, peer: &str, outcome: OutcomeKind) -> Rating {
        let environment = self.environment;
        let rating = self.entry(peer);

        let updated = match outcome.comparison() {
            Some(Comparison::PeerWins(reference)) => {
                environment.rate_1vs1(*rating, reference.rating()).0
            }
            Some(Comparison::PeerLoses(reference)) => {
                environment.rate_1vs1(reference.rating(), *rating).1
            }
            None => *rating,
        };

        trace!(
            peer,
            %outcome,
            mu = updated.mu(),
            sigma = updated.sigma(),
            "Updated belief, karma {:.3} -> {:.3}",
            karma(rating),
            karma(&updated)
        );

        *rating = updated;
        updated
    }

    /// Like [`BeliefStore::update_belief`] for an outcome named by an external collaborator.
    pub fn update_belief_by_name(
        &mut self,
        peer: &str,
        outcome: &str,
    ) -> Result<Rating, PeerManagementError> {
        let outcome = outcome.parse::<OutcomeKind>()?;
        Ok(self.update_belief(peer, outcome))
    }

    fn entry(&mut self, peer: &str) -> &mut Rating {
        let prior = self.environment.prior();
        match &mut self.beliefs {
            Beliefs::Unbounded(beliefs) => beliefs.entry(peer.to_string()).or_insert(prior),
            Beliefs::Bounded(beliefs) => beliefs.get_or_insert_mut(peer.to_string(), || prior),
        }
    }
}
