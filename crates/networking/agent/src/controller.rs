use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarm_metrics::{
    BELIEF_UPDATES_TOTAL, SUBSCRIBED_PEERS, SUBSCRIPTION_EVICTIONS_TOTAL, TRACKED_BELIEFS,
    inc_int_counter_vec, inc_int_counter_vec_by, set_int_gauge_vec,
};
use swarm_peer_management::{
    belief::BeliefStore,
    karma::karma,
    outcome::OutcomeKind,
    rating::{Rating, RatingEnvironment},
    selector::select_weighted,
};
use tracing::{debug, info, trace, warn};

use crate::{
    config::AgentConfig,
    constants::{
        BLOCK_DISCOVERY_DEPTH, BUSY_IDLE_DELAY, CANDIDATE_MIN_KARMA, CANDIDATE_PEER_LIMIT,
        CHAIN_REQUEST_DEPTH, PEERLESS_IDLE_DELAY, STALE_NETWORK_TIMEOUT,
    },
    errors::AgentError,
    event::SwarmEvent,
    status_report::SitRep,
    subscription::{SubscriptionChange, SubscriptionSet},
    transport::SwarmTransport,
};

/// A swarm node agent.
///
/// The agent turns swarm events into belief updates, pushes the resulting karma back to the
/// swarm, and keeps a bounded set of subscriptions to the peers it trusts most. It is driven by
/// the swarm one event at a time and owns all of its state, so no locking is involved.
pub struct AgentController<T> {
    config: AgentConfig,
    transport: T,
    beliefs: BeliefStore,
    subscriptions: SubscriptionSet,
    /// Peers with an outstanding chain request.
    in_flight: HashSet<String>,
    last_remote_activity: Instant,
    own_location: String,
    rng: ChaCha8Rng,
}

impl<T: SwarmTransport> AgentController<T> {
    pub fn new(config: AgentConfig, transport: T) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let own_location = transport.query_own_location();

        info!(
            %own_location,
            max_peers = config.max_peers,
            seed_peers = config.peer_list.len(),
            introductions = config.introductions.len(),
            "Starting swarm agent"
        );

        Self {
            beliefs: BeliefStore::new(RatingEnvironment::default(), config.max_tracked_beliefs),
            subscriptions: SubscriptionSet::new(config.max_peers),
            in_flight: HashSet::new(),
            last_remote_activity: Instant::now(),
            own_location,
            rng,
            config,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn beliefs(&self) -> &BeliefStore {
        &self.beliefs
    }

    pub fn beliefs_mut(&mut self) -> &mut BeliefStore {
        &mut self.beliefs
    }

    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    pub fn in_flight(&self) -> &HashSet<String> {
        &self.in_flight
    }

    pub fn own_location(&self) -> &str {
        &self.own_location
    }

    pub fn last_remote_activity(&self) -> Instant {
        self.last_remote_activity
    }

    pub fn karma(&self, host: &str) -> f64 {
        self.beliefs.karma(host)
    }

    /// Dispatch a swarm event to its handler. Returns the delay hint for idle ticks.
    pub fn handle_event(&mut self, event: SwarmEvent) -> Result<Option<Duration>, AgentError> {
        match event {
            SwarmEvent::Idle => return self.on_idle().map(Some),
            SwarmEvent::Peerless => self.on_peerless(),
            SwarmEvent::PingFailed { host } => self.on_ping_failed(&host),
            SwarmEvent::PingSucceeded { host } => self.on_ping_succeeded(&host),
            SwarmEvent::NewPeerDiscovered { host } => self.on_new_peer_discovered(&host),
            SwarmEvent::NewBlockIdFound { host, block_id } => {
                self.on_new_block_id_found(&host, &block_id)
            }
            SwarmEvent::BlockIdRepeated { host, block_id } => {
                self.on_block_id_repeated(&host, &block_id)
            }
            SwarmEvent::LooseBlock { host, block_id } => self.on_loose_block(&host, &block_id),
            SwarmEvent::BlockSupplied { host, block_id } => {
                self.on_block_supplied(&host, &block_id)
            }
            SwarmEvent::BlockNotSupplied { host, block_id } => {
                self.on_block_not_supplied(&host, &block_id)
            }
        }
        Ok(None)
    }

    /// Pick a candidate peer weighted by karma and subscribe to it.
    pub fn on_idle(&mut self) -> Result<Duration, AgentError> {
        let candidates: Vec<String> = self
            .transport
            .get_peers(CANDIDATE_PEER_LIMIT, CANDIDATE_MIN_KARMA)
            .into_iter()
            .filter(|host| !self.config.is_introduction(host))
            .collect();

        debug!(
            candidates = candidates.len(),
            subscriptions = self.subscriptions.len(),
            blocks = self.transport.block_count(),
            "Idle tick"
        );

        if candidates.is_empty() {
            return Ok(PEERLESS_IDLE_DELAY);
        }

        let beliefs = &self.beliefs;
        let selected = match select_weighted(&candidates, |host| beliefs.karma(host), &mut self.rng)
        {
            Ok(selected) => selected.clone(),
            Err(err) => {
                warn!("Failed to select a peer: {err}");
                return Ok(PEERLESS_IDLE_DELAY);
            }
        };

        self.request_subscription(&selected)?;
        Ok(BUSY_IDLE_DELAY)
    }

    /// Rate the seed peers and introductions, and ping the seeds.
    pub fn on_peerless(&mut self) {
        info!(
            seed_peers = self.config.peer_list.len(),
            "No peers known, falling back to seed peers"
        );

        for host in self.config.peer_list.clone() {
            self.apply_outcome(&host, OutcomeKind::PeerlessInitial);
            self.transport.ping(&host);
        }
        for host in self.config.introductions.clone() {
            self.apply_outcome(&host, OutcomeKind::PeerlessIntro);
        }
    }

    pub fn on_ping_failed(&mut self, host: &str) {
        self.apply_outcome(host, OutcomeKind::PingFailed);
        self.in_flight.remove(host);
    }

    pub fn on_ping_succeeded(&mut self, host: &str) {
        self.apply_outcome(host, OutcomeKind::PingSucceeded);
        self.in_flight.remove(host);
        self.record_remote_activity();
    }

    pub fn on_new_peer_discovered(&mut self, host: &str) {
        if host == self.own_location {
            trace!(host, "Ignoring discovery of our own location");
            return;
        }
        self.apply_outcome(host, OutcomeKind::NewPeerDiscovered);
    }

    pub fn on_new_block_id_found(&mut self, host: &str, block_id: &str) {
        trace!(host, block_id, "New block id found");
        self.apply_outcome(host, OutcomeKind::NewBlockIdFound);
        self.record_remote_activity();
    }

    pub fn on_block_id_repeated(&mut self, host: &str, block_id: &str) {
        trace!(host, block_id, "Block id repeated");
        self.apply_outcome(host, OutcomeKind::BlockIdRepeated);
    }

    /// A peer announced a block whose parent we do not have; penalise it and fetch the block.
    pub fn on_loose_block(&mut self, host: &str, block_id: &str) {
        debug!(host, block_id, "Loose block");
        self.apply_outcome(host, OutcomeKind::LooseBlock);
        self.transport.get_block(host, block_id);
    }

    pub fn on_block_supplied(&mut self, host: &str, block_id: &str) {
        trace!(host, block_id, "Block supplied");
        self.apply_outcome(host, OutcomeKind::BlockSupplied);
        self.record_remote_activity();
    }

    pub fn on_block_not_supplied(&mut self, host: &str, block_id: &str) {
        debug!(host, block_id, "Block not supplied");
        self.apply_outcome(host, OutcomeKind::BlockNotSupplied);
    }

    /// Apply an outcome named by an external collaborator.
    pub fn update_belief_by_name(
        &mut self,
        host: &str,
        outcome: &str,
    ) -> Result<Rating, AgentError> {
        let outcome = outcome.parse::<OutcomeKind>()?;
        Ok(self.apply_outcome(host, outcome))
    }

    /// Subscribe to `host`, or keep an existing subscription alive.
    pub fn request_subscription(&mut self, host: &str) -> Result<(), AgentError> {
        let beliefs = &self.beliefs;
        let change = self.subscriptions.subscribe(host, |peer| beliefs.karma(peer));

        let evicted = match change {
            SubscriptionChange::Refreshed => {
                trace!(host, "Refreshing subscription");
                self.transport.ping(host);
                return Ok(());
            }
            SubscriptionChange::Subscribed { evicted } => evicted,
        };

        info!(host, karma = self.karma(host), "Subscribing to peer");
        self.transport.ping(host);
        self.transport.discover_blocks(host, BLOCK_DISCOVERY_DEPTH);

        for peer in &evicted {
            info!(peer, karma = self.karma(peer), "Unsubscribing from peer");
            self.transport.stop_block_discover(peer, BLOCK_DISCOVERY_DEPTH);
        }
        if !evicted.is_empty() {
            inc_int_counter_vec_by(
                &SUBSCRIPTION_EVICTIONS_TOTAL,
                evicted.len() as u64,
                &[self.own_location.as_str()],
            );
        }
        set_int_gauge_vec(
            &SUBSCRIBED_PEERS,
            self.subscriptions.len() as i64,
            &[self.own_location.as_str()],
        );

        self.publish_status_report()
    }

    /// Ask `host` for its chain unless a request to it is already outstanding.
    pub fn request_chain(&mut self, host: &str) {
        self.request_chain_at(host, Instant::now());
    }

    /// [`AgentController::request_chain`] as seen at time `now`.
    pub fn request_chain_at(&mut self, host: &str, now: Instant) {
        if now.saturating_duration_since(self.last_remote_activity) > STALE_NETWORK_TIMEOUT {
            if !self.in_flight.is_empty() {
                debug!(
                    in_flight = self.in_flight.len(),
                    "Network looks stalled, forgetting outstanding chain requests"
                );
            }
            self.in_flight.clear();
        }

        if !self.in_flight.insert(host.to_string()) {
            trace!(host, "Chain request already in flight");
            return;
        }

        self.transport.load_chain(host, CHAIN_REQUEST_DEPTH);
        self.transport.ping(host);
    }

    /// Snapshot of the current subscriptions and their karma.
    pub fn status_report(&self) -> SitRep {
        let beliefs = &self.beliefs;
        SitRep::new(
            self.own_location.clone(),
            self.subscriptions.weights(|peer| beliefs.karma(peer)),
        )
    }

    fn publish_status_report(&mut self) -> Result<(), AgentError> {
        let report = self.status_report().to_json()?;
        self.transport.set_status_report(report);
        Ok(())
    }

    fn apply_outcome(&mut self, host: &str, outcome: OutcomeKind) -> Rating {
        let rating = self.beliefs.update_belief(host, outcome);
        self.transport.set_karma(host, karma(&rating));

        inc_int_counter_vec(&BELIEF_UPDATES_TOTAL, &[outcome.as_str()]);
        set_int_gauge_vec(
            &TRACKED_BELIEFS,
            self.beliefs.len() as i64,
            &[self.own_location.as_str()],
        );

        rating
    }

    fn record_remote_activity(&mut self) {
        self.last_remote_activity = Instant::now();
    }
}
