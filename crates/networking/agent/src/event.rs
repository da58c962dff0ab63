/// Events raised by the swarm layer, delivered to the agent one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwarmEvent {
    Idle,
    Peerless,
    PingFailed { host: String },
    PingSucceeded { host: String },
    NewPeerDiscovered { host: String },
    NewBlockIdFound { host: String, block_id: String },
    BlockIdRepeated { host: String, block_id: String },
    LooseBlock { host: String, block_id: String },
    BlockSupplied { host: String, block_id: String },
    BlockNotSupplied { host: String, block_id: String },
}
