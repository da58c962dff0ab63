pub mod helpers;

pub use helpers::{inc_int_counter_vec, inc_int_counter_vec_by, set_int_gauge_vec};
use helpers::{create_int_counter_vec, create_int_gauge_vec};
use prometheus_exporter::prometheus::{IntCounterVec, IntGaugeVec};

lazy_static::lazy_static! {
    pub static ref BELIEF_UPDATES_TOTAL: IntCounterVec = create_int_counter_vec(
        "swarm_belief_updates_total",
        "Number of belief updates applied, by outcome",
        &["outcome"]
    );

    pub static ref TRACKED_BELIEFS: IntGaugeVec = create_int_gauge_vec(
        "swarm_tracked_beliefs",
        "Number of peers the belief store currently holds a rating for",
        &["agent"]
    );

    pub static ref SUBSCRIBED_PEERS: IntGaugeVec = create_int_gauge_vec(
        "swarm_subscribed_peers",
        "Number of peers the agent is currently subscribed to",
        &["agent"]
    );

    pub static ref SUBSCRIPTION_EVICTIONS_TOTAL: IntCounterVec = create_int_counter_vec(
        "swarm_subscription_evictions_total",
        "Number of peers evicted from the subscription set",
        &["agent"]
    );
}
