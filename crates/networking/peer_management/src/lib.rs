//! Peer reputation: ratings, the belief update rule, karma and weighted peer selection.

pub mod belief;
pub mod errors;
pub mod karma;
pub mod outcome;
pub mod rating;
pub mod selector;
