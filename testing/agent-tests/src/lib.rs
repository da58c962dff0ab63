//! Integration tests for the swarm agent live under `tests/`.
