//! A swarm node agent that rates its peers and keeps a bounded set of subscriptions to the
//! ones it trusts most.

pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod event;
pub mod status_report;
pub mod subscription;
pub mod transport;
