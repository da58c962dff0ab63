/// The swarm layer an agent drives.
///
/// Every command is fire-and-forget: results come back later as [`crate::event::SwarmEvent`]s.
pub trait SwarmTransport {
    fn ping(&mut self, host: &str);

    fn discover_blocks(&mut self, host: &str, depth: u32);

    fn stop_block_discover(&mut self, host: &str, depth: u32);

    fn get_block(&mut self, host: &str, block_id: &str);

    fn load_chain(&mut self, host: &str, depth: u32);

    /// Publish the karma the agent holds for `host`.
    fn set_karma(&mut self, host: &str, karma: f64);

    fn get_karma(&self, host: &str) -> f64;

    /// Up to `max_count` known peers whose published karma is at least `min_karma`.
    fn get_peers(&self, max_count: usize, min_karma: f64) -> Vec<String>;

    fn query_own_location(&self) -> String;

    /// Publish the agent's status report as a JSON document.
    fn set_status_report(&mut self, report: String);

    /// Total number of blocks in the local chain.
    fn block_count(&self) -> u64;
}

/// An outbound command, for transports that queue commands rather than act on them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SwarmCommand {
    Ping { host: String },
    DiscoverBlocks { host: String, depth: u32 },
    StopBlockDiscover { host: String, depth: u32 },
    GetBlock { host: String, block_id: String },
    LoadChain { host: String, depth: u32 },
    SetKarma { host: String, karma: f64 },
    SetStatusReport { report: String },
}
