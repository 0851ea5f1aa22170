use rand::Rng;
use std::sync::Arc;

use crate::bus::StatusBus;
use crate::client::Platform;
use crate::engine::fanout::FanoutExecutor;
use crate::types::{AgentConfig, AgentRun, Stage};

/// Everything one agent's pipeline needs, assembled before the pipeline is
/// spawned. Deliberately immutable and self-contained: each agent gets its
/// own context up front, so nothing is captured from a shared loop variable
/// and nothing is shared mutably between sibling agents.
pub struct AgentContext {
    pub config: AgentConfig,
    pub platform: Arc<dyn Platform>,
    pub bus: StatusBus,
    pub messages_per_resource: usize,
    pub suffix_min: u32,
    pub suffix_max: u32,
}

/// Drive one agent through Connecting → Clearing → Provisioning →
/// Populating → Closing → Done.
///
/// Stages are separated by strict barriers: a stage starts only once every
/// operation of the previous stage has settled. Unit-operation failures are
/// reported on the bus and isolated; only a connection failure ends the
/// pipeline early, jumping straight to `Done`.
pub async fn run_agent(ctx: AgentContext) -> AgentRun {
    let mut run = AgentRun::new(ctx.config.label.clone());
    let label = ctx.config.label.as_str();
    let bus = &ctx.bus;
    let executor = FanoutExecutor::new(ctx.bus.clone(), label);

    bus.info(label, "connecting");
    let session = match ctx.platform.connect(&ctx.config.credential).await {
        Ok(session) => session,
        Err(err) => {
            bus.error(label, format!("{err}; skipping all stages"));
            run.stage = Stage::Done;
            bus.info(label, "finished");
            return run;
        }
    };

    run.stage = Stage::Clearing;
    let in_scope = match session.list_resources().await {
        Ok(resources) => resources,
        Err(err) => {
            // Treated as an empty scope; the run still provisions.
            bus.error(label, format!("could not list scope: {err}"));
            Vec::new()
        }
    };
    bus.info(label, format!("clearing {} resources", in_scope.len()));
    let deletions: Vec<(String, _)> = in_scope
        .into_iter()
        .map(|resource| {
            let session = Arc::clone(&session);
            let op = format!("delete {}", resource.name);
            (op, async move { session.delete_resource(&resource).await })
        })
        .collect();
    executor.settle(deletions).await;

    run.stage = Stage::Provisioning;
    bus.info(label, format!("provisioning {} resources", ctx.config.quota));
    let creations: Vec<(String, _)> = (0..ctx.config.quota)
        .map(|_| {
            // Independent draws; collisions are possible and not deduplicated.
            let suffix: u32 = rand::rng().random_range(ctx.suffix_min..=ctx.suffix_max);
            let name = format!("{}-{}", ctx.config.prefix, suffix);
            let session = Arc::clone(&session);
            let op = format!("create {name}");
            (op, async move { session.create_resource(&name).await })
        })
        .collect();
    for created in executor.settle(creations).await {
        run.record(created);
    }

    run.stage = Stage::Populating;
    bus.info(
        label,
        format!(
            "populating {} resources, {} messages each",
            run.resources.len(),
            ctx.messages_per_resource
        ),
    );
    let batches: Vec<_> = run
        .resources
        .iter()
        .map(|resource| {
            let session = Arc::clone(&session);
            let remote = resource.remote.clone();
            let payload = ctx.config.payload.clone();
            let count = ctx.messages_per_resource;
            let executor = &executor;
            async move {
                let sends: Vec<(String, _)> = (1..=count)
                    .map(|i| {
                        let session = Arc::clone(&session);
                        let remote = remote.clone();
                        let payload = payload.clone();
                        let op = format!("send {i}/{count} into {}", remote.name);
                        (op, async move { session.send_message(&remote, &payload).await })
                    })
                    .collect();
                executor.settle(sends).await;
            }
        })
        .collect();
    futures::future::join_all(batches).await;

    run.stage = Stage::Closing;
    session.close().await;

    run.stage = Stage::Done;
    bus.info(label, "finished");
    run
}
