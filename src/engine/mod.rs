pub mod fanout;
pub mod orchestrator;
pub mod pipeline;

pub use fanout::FanoutExecutor;
pub use orchestrator::{Orchestrator, RunHandle, RunRequest};
pub use pipeline::{run_agent, AgentContext};
