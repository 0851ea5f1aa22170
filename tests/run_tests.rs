use std::sync::Arc;

use convoy::bus::{StatusBus, StatusFeed};
use convoy::client::InMemoryPlatform;
use convoy::config::RunConfig;
use convoy::engine::{Orchestrator, RunRequest};
use convoy::lifecycle::LifecycleController;
use convoy::types::{RunState, Severity, Stage};

struct Harness {
    platform: InMemoryPlatform,
    controller: Arc<LifecycleController>,
    orchestrator: Orchestrator,
    feed: StatusFeed,
}

fn harness(config: RunConfig) -> Harness {
    let platform = InMemoryPlatform::new();
    let (bus, feed) = StatusBus::channel();
    let controller = Arc::new(LifecycleController::new(bus.clone()));
    let orchestrator = Orchestrator::new(
        Arc::new(platform.clone()),
        bus,
        Arc::clone(&controller),
        config,
    );
    Harness {
        platform,
        controller,
        orchestrator,
        feed,
    }
}

fn request(agents: usize) -> RunRequest {
    RunRequest {
        agents,
        credentials: (1..=agents).map(|i| format!("credential-{i}")).collect(),
        prefix: "batch".to_string(),
        payload: "payload".to_string(),
    }
}

fn small_config(total_quota: usize) -> RunConfig {
    RunConfig {
        total_quota,
        ..RunConfig::default()
    }
}

#[tokio::test]
async fn test_each_agent_count_spawns_exactly_that_many_runs() {
    for agents in 1..=3 {
        let mut h = harness(small_config(6));

        let handle = h.orchestrator.run(request(agents)).unwrap();
        let session = handle.finished().await.unwrap();

        assert_eq!(session.state, RunState::Done);
        assert_eq!(session.agents.len(), agents);
        assert!(session.agents.iter().all(|a| a.stage == Stage::Done));
        assert!(h.controller.is_idle());

        // Exactly one closing event for the whole run.
        let events = h.feed.drain();
        let closing: Vec<_> = events
            .iter()
            .filter(|e| e.text.contains("idle again"))
            .collect();
        assert_eq!(closing.len(), 1);
    }
}

#[tokio::test]
async fn test_quota_is_integer_division_with_remainder_discarded() {
    let h = harness(small_config(70));

    let handle = h.orchestrator.run(request(3)).unwrap();
    let session = handle.finished().await.unwrap();

    for agent in &session.agents {
        assert_eq!(agent.resources.len(), 23);
    }
    // 70 / 3 = 23 per agent; the remaining resource is never provisioned.
    assert_eq!(h.platform.counters().creates, 69);
}

#[tokio::test]
async fn test_five_messages_per_created_resource() {
    let h = harness(small_config(9));

    let handle = h.orchestrator.run(request(3)).unwrap();
    let session = handle.finished().await.unwrap();

    let created: usize = session.agents.iter().map(|a| a.resources.len()).sum();
    assert_eq!(created, 9);
    assert_eq!(h.platform.counters().sends, created * 5);
}

#[tokio::test]
async fn test_clearing_sweeps_every_seeded_resource_once() {
    let h = harness(small_config(2));
    h.platform.seed("credential-1", &["old-1", "old-2"]);
    h.platform.seed("credential-2", &["old-3"]);
    h.platform.refuse_delete("old-2");

    let handle = h.orchestrator.run(request(2)).unwrap();
    handle.finished().await.unwrap();

    // Three deletions attempted, none retried, the refused one still there.
    assert_eq!(h.platform.counters().deletes, 3);
    assert!(h
        .platform
        .scope_names("credential-1")
        .contains(&"old-2".to_string()));
}

#[tokio::test]
async fn test_failed_agent_does_not_disturb_the_others() {
    let mut h = harness(small_config(6));
    h.platform.seed("credential-2", &["stale"]);
    h.platform.deny_credential("credential-2");

    let handle = h.orchestrator.run(request(3)).unwrap();
    let session = handle.finished().await.unwrap();

    assert_eq!(session.agents.len(), 3);
    assert!(session.agents.iter().all(|a| a.stage == Stage::Done));

    let failed = session
        .agents
        .iter()
        .find(|a| a.label == "agent-2")
        .unwrap();
    assert!(failed.resources.is_empty());

    // The denied agent performed zero platform operations past connect:
    // only the two healthy scopes were listed, cleared, and filled.
    let counters = h.platform.counters();
    assert_eq!(counters.lists, 2);
    assert_eq!(counters.deletes, 0);
    assert_eq!(counters.creates, 4);
    assert_eq!(counters.sends, 20);
    assert_eq!(h.platform.scope_names("credential-2"), vec!["stale"]);

    let events = h.feed.drain();
    assert!(events
        .iter()
        .any(|e| e.agent == "agent-2" && e.severity == Severity::Error));
    // The run still closed normally.
    assert!(h.controller.is_idle());
}

#[tokio::test]
async fn test_empty_scope_run_provisions_full_quota() {
    let h = harness(small_config(8));

    let handle = h.orchestrator.run(request(1)).unwrap();
    let session = handle.finished().await.unwrap();

    let counters = h.platform.counters();
    assert_eq!(counters.deletes, 0);
    assert_eq!(counters.creates, 8);
    assert_eq!(session.agents[0].resources.len(), 8);
}

#[tokio::test]
async fn test_concurrent_agents_events_sum_and_stay_ordered_per_agent() {
    let mut h = harness(small_config(6));

    let handle = h.orchestrator.run(request(3)).unwrap();
    handle.finished().await.unwrap();

    let events = h.feed.drain();
    for agent in ["agent-1", "agent-2", "agent-3"] {
        let own: Vec<_> = events.iter().filter(|e| e.agent == agent).collect();
        // connecting + clearing + provisioning + 2 creates + populating
        // + 10 sends + finished
        assert_eq!(own.len(), 17);
        assert_eq!(own.first().unwrap().text, "connecting");
        assert_eq!(own.last().unwrap().text, "finished");
    }
}

#[tokio::test]
async fn test_resource_sets_never_cross_agents() {
    let h = harness(small_config(10));

    let handle = h.orchestrator.run(request(2)).unwrap();
    let session = handle.finished().await.unwrap();

    let ids_a: Vec<_> = session.agents[0]
        .resources
        .iter()
        .map(|r| r.remote.id)
        .collect();
    assert!(session.agents[1]
        .resources
        .iter()
        .all(|r| !ids_a.contains(&r.remote.id)));
}
