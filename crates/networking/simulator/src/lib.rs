//! An in-memory swarm of agents for exercising peer reputation end to end.

pub mod behaviour;
pub mod config;
pub mod network;
pub mod report;
pub mod transport;
