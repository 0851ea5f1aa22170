use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use convoy::bus::StatusBus;
use convoy::client::InMemoryPlatform;
use convoy::config::RunConfig;
use convoy::engine::{Orchestrator, RunRequest};
use convoy::lifecycle::LifecycleController;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Concurrent multi-agent resource lifecycle runs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a run against the built-in in-memory platform
    Run {
        #[arg(long, default_value_t = 2, help = "Number of agents (one credential each)")]
        agents: usize,
        #[arg(long, default_value = "demo", help = "Shared resource-name prefix")]
        prefix: String,
        #[arg(long, default_value = "hello from convoy", help = "Shared message payload")]
        message: String,
        #[arg(long, help = "Print status events as JSON lines")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            agents,
            prefix,
            message,
            json,
        } => run_demo(agents, prefix, message, json).await?,
    }

    Ok(())
}

async fn run_demo(agents: usize, prefix: String, message: String, json: bool) -> Result<()> {
    let platform = InMemoryPlatform::new();
    let credentials: Vec<String> = (1..=agents)
        .map(|i| format!("demo-credential-{i}"))
        .collect();
    // Give every scope something to clear.
    for credential in &credentials {
        platform.seed(credential, &["stale-a", "stale-b", "stale-c"]);
    }

    let (bus, mut feed) = StatusBus::channel();
    let controller = Arc::new(LifecycleController::new(bus.clone()));
    let orchestrator = Orchestrator::new(
        Arc::new(platform),
        bus,
        Arc::clone(&controller),
        RunConfig::from_env(),
    );

    let handle = orchestrator.run(RunRequest {
        agents,
        credentials,
        prefix,
        payload: message,
    })?;

    let printer = tokio::spawn(async move {
        while let Some(event) = feed.recv().await {
            if json {
                println!("{}", serde_json::to_string(&event).unwrap_or_default());
            } else {
                println!("{event}");
            }
        }
    });

    let session = handle.finished().await?;

    // Release the remaining bus handles so the printer sees end-of-stream.
    drop(orchestrator);
    drop(controller);
    printer.await?;

    println!(
        "run {} done: {} agents, {} resources created",
        session.id,
        session.agents.len(),
        session
            .agents
            .iter()
            .map(|a| a.resources.len())
            .sum::<usize>()
    );
    Ok(())
}
