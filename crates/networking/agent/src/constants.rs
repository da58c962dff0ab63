use std::time::Duration;

/// Depth used when starting or stopping block discovery on a subscribed peer.
pub const BLOCK_DISCOVERY_DEPTH: u32 = 10;

/// Depth requested when asking a peer for its chain.
pub const CHAIN_REQUEST_DEPTH: u32 = 40;

/// Maximum number of candidate peers fetched from the swarm on an idle tick.
pub const CANDIDATE_PEER_LIMIT: usize = 10;

/// Minimum karma the swarm should apply when listing candidate peers.
pub const CANDIDATE_MIN_KARMA: f64 = -500.0;

/// Delay hint returned from an idle tick that found no candidate peers.
pub const PEERLESS_IDLE_DELAY: Duration = Duration::from_millis(100);

/// Delay hint returned from an idle tick that did some work.
pub const BUSY_IDLE_DELAY: Duration = Duration::ZERO;

/// Without remote activity for this long, outstanding chain requests are forgotten.
pub const STALE_NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_MAX_PEERS: usize = 8;
