use std::{
    thread,
    time::{Duration, Instant},
};

use rstest::rstest;
use swarm_agent::{
    config::AgentConfig, constants::STALE_NETWORK_TIMEOUT, controller::AgentController,
    event::SwarmEvent, transport::SwarmCommand,
};
use swarm_test_utils::RecordingTransport;

const OWN: &str = "127.0.0.1:9000";
const PEER: &str = "127.0.0.1:9001";
const OTHER: &str = "127.0.0.1:9002";
const BLOCK: &str = "00ff";

fn agent() -> AgentController<RecordingTransport> {
    AgentController::new(AgentConfig::default(), RecordingTransport::new(OWN))
}

fn chain_requests(agent: &AgentController<RecordingTransport>) -> usize {
    agent
        .transport()
        .commands
        .iter()
        .filter(|command| matches!(command, SwarmCommand::LoadChain { .. }))
        .count()
}

#[test]
fn test_chain_request_is_sent_once() {
    let mut agent = agent();

    agent.request_chain(PEER);
    assert_eq!(
        agent.transport_mut().take_commands(),
        vec![
            SwarmCommand::LoadChain {
                host: PEER.to_string(),
                depth: 40
            },
            SwarmCommand::Ping {
                host: PEER.to_string()
            },
        ]
    );
    assert!(agent.in_flight().contains(PEER));

    agent.request_chain(PEER);
    assert!(agent.transport().commands.is_empty());
}

#[test]
fn test_stale_network_allows_retry() {
    let mut agent = agent();
    agent.request_chain(PEER);
    agent.transport_mut().take_commands();

    let later = agent.last_remote_activity() + Duration::from_secs(11);
    agent.request_chain_at(PEER, later);

    assert_eq!(agent.transport().commands.len(), 2);
    assert!(agent.in_flight().contains(PEER));
}

#[test]
fn test_recent_activity_keeps_requests_in_flight() {
    let mut agent = agent();
    agent.request_chain(PEER);
    agent.transport_mut().take_commands();

    let soon = agent.last_remote_activity() + Duration::from_secs(9);
    agent.request_chain_at(PEER, soon);

    assert!(agent.transport().commands.is_empty());
}

#[test]
fn test_exactly_stale_timeout_keeps_requests_in_flight() {
    let mut agent = agent();
    agent.request_chain(PEER);
    agent.transport_mut().take_commands();

    let boundary = agent.last_remote_activity() + STALE_NETWORK_TIMEOUT;
    agent.request_chain_at(PEER, boundary);

    assert!(agent.transport().commands.is_empty());
    assert!(agent.in_flight().contains(PEER));
}

#[test]
fn test_ping_result_clears_in_flight() {
    let mut agent = agent();
    agent.request_chain(PEER);
    agent.on_ping_failed(PEER);
    assert!(!agent.in_flight().contains(PEER));

    agent.request_chain(PEER);
    agent.on_ping_succeeded(PEER);
    assert!(!agent.in_flight().contains(PEER));
}

#[rstest]
#[case::ping_succeeded(SwarmEvent::PingSucceeded { host: OTHER.to_string() }, true)]
#[case::new_block_id_found(
    SwarmEvent::NewBlockIdFound { host: OTHER.to_string(), block_id: BLOCK.to_string() },
    true
)]
#[case::block_supplied(
    SwarmEvent::BlockSupplied { host: OTHER.to_string(), block_id: BLOCK.to_string() },
    true
)]
#[case::ping_failed(SwarmEvent::PingFailed { host: OTHER.to_string() }, false)]
#[case::new_peer_discovered(SwarmEvent::NewPeerDiscovered { host: OTHER.to_string() }, false)]
#[case::block_id_repeated(
    SwarmEvent::BlockIdRepeated { host: OTHER.to_string(), block_id: BLOCK.to_string() },
    false
)]
#[case::loose_block(
    SwarmEvent::LooseBlock { host: OTHER.to_string(), block_id: BLOCK.to_string() },
    false
)]
#[case::block_not_supplied(
    SwarmEvent::BlockNotSupplied { host: OTHER.to_string(), block_id: BLOCK.to_string() },
    false
)]
fn test_remote_activity_keeps_chain_requests_alive(
    #[case] event: SwarmEvent,
    #[case] counts_as_activity: bool,
) -> anyhow::Result<()> {
    let mut agent = agent();
    agent.request_chain(PEER);
    agent.transport_mut().take_commands();

    let before = agent.last_remote_activity();
    thread::sleep(Duration::from_millis(20));
    agent.handle_event(event)?;
    agent.transport_mut().take_commands();

    // Stale as seen from `before`, fresh as seen from any activity recorded after the sleep.
    let at = before + STALE_NETWORK_TIMEOUT + Duration::from_millis(1);
    agent.request_chain_at(PEER, at);

    if counts_as_activity {
        assert!(agent.last_remote_activity() > before);
        assert!(agent.last_remote_activity() <= Instant::now());
        assert_eq!(chain_requests(&agent), 0);
    } else {
        assert_eq!(agent.last_remote_activity(), before);
        assert_eq!(chain_requests(&agent), 1);
    }
    assert!(agent.in_flight().contains(PEER));
    Ok(())
}
