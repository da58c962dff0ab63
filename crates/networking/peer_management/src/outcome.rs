use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{errors::PeerManagementError, rating::Rating};

/// Canonical outcomes a peer is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRating {
    NewData,
    AlreadyKnown,
    ConnectionProblem,
    BadBlock,
}

impl ReferenceRating {
    pub const ALL: [ReferenceRating; 4] = [
        ReferenceRating::NewData,
        ReferenceRating::AlreadyKnown,
        ReferenceRating::ConnectionProblem,
        ReferenceRating::BadBlock,
    ];

    /// The fixed rating this reference stands for.
    pub const fn rating(self) -> Rating {
        match self {
            ReferenceRating::NewData => Rating::new(150.0, 5.0),
            ReferenceRating::AlreadyKnown => Rating::new(100.0, 5.0),
            ReferenceRating::ConnectionProblem => Rating::new(60.0, 5.0),
            ReferenceRating::BadBlock => Rating::new(20.0, 5.0),
        }
    }
}

/// How a peer fares in a comparison against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The peer wins against the reference.
    PeerWins(ReferenceRating),
    /// The reference wins against the peer.
    PeerLoses(ReferenceRating),
}

/// Everything the swarm can tell the agent about a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    PingFailed,
    PingSucceeded,
    PeerlessInitial,
    PeerlessIntro,
    NewPeerDiscovered,
    NewBlockIdFound,
    BlockIdRepeated,
    LooseBlock,
    BlockSupplied,
    BlockNotSupplied,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 10] = [
        OutcomeKind::PingFailed,
        OutcomeKind::PingSucceeded,
        OutcomeKind::PeerlessInitial,
        OutcomeKind::PeerlessIntro,
        OutcomeKind::NewPeerDiscovered,
        OutcomeKind::NewBlockIdFound,
        OutcomeKind::BlockIdRepeated,
        OutcomeKind::LooseBlock,
        OutcomeKind::BlockSupplied,
        OutcomeKind::BlockNotSupplied,
    ];

    /// Which comparison this outcome triggers, or `None` if it leaves the rating untouched.
    pub const fn comparison(self) -> Option<Comparison> {
        match self {
            OutcomeKind::PingFailed | OutcomeKind::BlockNotSupplied => {
                Some(Comparison::PeerLoses(ReferenceRating::ConnectionProblem))
            }
            OutcomeKind::LooseBlock => Some(Comparison::PeerLoses(ReferenceRating::BadBlock)),
            OutcomeKind::PeerlessInitial | OutcomeKind::BlockIdRepeated => {
                Some(Comparison::PeerWins(ReferenceRating::AlreadyKnown))
            }
            OutcomeKind::PeerlessIntro | OutcomeKind::NewBlockIdFound => {
                Some(Comparison::PeerWins(ReferenceRating::NewData))
            }
            OutcomeKind::PingSucceeded
            | OutcomeKind::NewPeerDiscovered
            | OutcomeKind::BlockSupplied => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::PingFailed => "ping_failed",
            OutcomeKind::PingSucceeded => "ping_succeeded",
            OutcomeKind::PeerlessInitial => "peerless_initial",
            OutcomeKind::PeerlessIntro => "peerless_intro",
            OutcomeKind::NewPeerDiscovered => "new_peer_discovered",
            OutcomeKind::NewBlockIdFound => "new_block_id_found",
            OutcomeKind::BlockIdRepeated => "block_id_repeated",
            OutcomeKind::LooseBlock => "loose_block",
            OutcomeKind::BlockSupplied => "block_supplied",
            OutcomeKind::BlockNotSupplied => "block_not_supplied",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeKind {
    type Err = PeerManagementError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        OutcomeKind::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == name)
            .ok_or_else(|| PeerManagementError::UnknownOutcome(name.to_string()))
    }
}
