use std::time::Duration;

use rstest::rstest;
use swarm_agent::{
    config::AgentConfig,
    constants::PEERLESS_IDLE_DELAY,
    controller::AgentController,
    errors::AgentError,
    event::SwarmEvent,
    transport::SwarmCommand,
};
use swarm_peer_management::{errors::PeerManagementError, rating::Rating};
use swarm_test_utils::RecordingTransport;

const OWN: &str = "127.0.0.1:9000";
const SEED: &str = "127.0.0.1:9100";
const INTRO: &str = "127.0.0.1:9200";
const PEER: &str = "127.0.0.1:9001";
const BLOCK: &str = "00ff";

fn agent_with(transport: RecordingTransport) -> AgentController<RecordingTransport> {
    let config = AgentConfig {
        max_peers: 4,
        peer_list: vec![SEED.to_string()],
        introductions: vec![INTRO.to_string()],
        seed: Some(3),
        ..Default::default()
    };
    AgentController::new(config, transport)
}

fn agent() -> AgentController<RecordingTransport> {
    agent_with(RecordingTransport::new(OWN))
}

fn host_event(kind: &str) -> SwarmEvent {
    let host = PEER.to_string();
    let block_id = BLOCK.to_string();
    match kind {
        "ping_failed" => SwarmEvent::PingFailed { host },
        "ping_succeeded" => SwarmEvent::PingSucceeded { host },
        "new_peer_discovered" => SwarmEvent::NewPeerDiscovered { host },
        "new_block_id_found" => SwarmEvent::NewBlockIdFound { host, block_id },
        "block_id_repeated" => SwarmEvent::BlockIdRepeated { host, block_id },
        "loose_block" => SwarmEvent::LooseBlock { host, block_id },
        "block_supplied" => SwarmEvent::BlockSupplied { host, block_id },
        "block_not_supplied" => SwarmEvent::BlockNotSupplied { host, block_id },
        other => panic!("no event named {other}"),
    }
}

#[rstest]
#[case("new_block_id_found", 1)]
#[case("block_id_repeated", 1)]
#[case("ping_succeeded", 0)]
#[case("new_peer_discovered", 0)]
#[case("block_supplied", 0)]
#[case("ping_failed", -1)]
#[case("block_not_supplied", -1)]
#[case("loose_block", -1)]
fn test_event_moves_karma(#[case] kind: &str, #[case] direction: i8) -> anyhow::Result<()> {
    let mut agent = agent();
    let before = agent.karma(PEER);

    assert_eq!(agent.handle_event(host_event(kind))?, None);

    let after = agent.karma(PEER);
    match direction {
        1 => assert!(after > before),
        -1 => assert!(after < before),
        _ => assert_eq!(after, before),
    }
    assert_eq!(agent.transport().karma.get(PEER).copied(), Some(after));
    Ok(())
}

#[test]
fn test_loose_block_fetches_the_block() -> anyhow::Result<()> {
    let mut agent = agent();
    agent.handle_event(host_event("loose_block"))?;

    assert!(agent.transport().commands.contains(&SwarmCommand::GetBlock {
        host: PEER.to_string(),
        block_id: BLOCK.to_string(),
    }));
    Ok(())
}

#[test]
fn test_discovering_ourselves_is_ignored() {
    let mut agent = agent();
    assert_eq!(agent.own_location(), OWN);
    agent.on_new_peer_discovered(OWN);

    assert!(agent.transport().commands.is_empty());
    assert!(!agent.beliefs().contains(OWN));
}

#[test]
fn test_peerless_rates_seeds_and_introductions() {
    let mut agent = agent();
    let prior = agent.karma(SEED);

    agent.on_peerless();

    assert_eq!(agent.transport().pinged(), vec![SEED]);
    assert!(agent.karma(SEED) > prior);
    assert!(agent.karma(INTRO) > agent.karma(SEED));
    assert!(agent.transport().karma.contains_key(INTRO));
}

#[test]
fn test_idle_without_candidates_backs_off() -> anyhow::Result<()> {
    let mut agent = agent_with(RecordingTransport::new(OWN).with_peers(&[INTRO]));

    assert_eq!(agent.handle_event(SwarmEvent::Idle)?, Some(PEERLESS_IDLE_DELAY));
    assert!(agent.transport().commands.is_empty());
    assert!(agent.subscriptions().is_empty());
    Ok(())
}

#[test]
fn test_idle_subscribes_to_a_candidate() -> anyhow::Result<()> {
    let mut agent = agent_with(RecordingTransport::new(OWN).with_peers(&[PEER, INTRO]));

    assert_eq!(agent.on_idle()?, Duration::ZERO);
    assert_eq!(agent.subscriptions().peers(), [PEER.to_string()]);
    assert_eq!(agent.transport().discovering(), vec![PEER]);
    Ok(())
}

#[test]
fn test_idle_prefers_trusted_candidates() -> anyhow::Result<()> {
    let trusted = "127.0.0.1:9002";
    let mut agent = agent_with(RecordingTransport::new(OWN).with_peers(&[PEER, trusted]));
    agent.beliefs_mut().set_rating(PEER, Rating::new(-50.0, 0.0));
    agent.beliefs_mut().set_rating(trusted, Rating::new(80.0, 0.0));

    for _ in 0..20 {
        agent.on_idle()?;
    }

    assert_eq!(agent.subscriptions().peers(), [trusted.to_string()]);
    Ok(())
}

#[test]
fn test_unknown_outcome_name_is_rejected() {
    let mut agent = agent();
    let result = agent.update_belief_by_name(PEER, "block_mined");

    assert!(matches!(
        result,
        Err(AgentError::PeerManagement(PeerManagementError::UnknownOutcome(_)))
    ));
    assert!(agent.transport().commands.is_empty());
}
