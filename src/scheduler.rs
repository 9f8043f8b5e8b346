//! In-process agent scheduler.
//!
//! Registers agents by identity label and triggers their poll cycles
//! periodically. Each agent's cycle runs to completion before that agent is
//! triggered again; cycle failures are logged and left to the next interval
//! (the scheduler never retries within a cycle). Distributed locking across
//! processes, keyed by the same identity labels, is the host's concern.

use crate::agent::{CachingAgent, CycleOutcome};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Scheduler holding the registered agent set
#[derive(Default)]
pub struct AgentScheduler {
    agents: BTreeMap<String, Arc<dyn CachingAgent>>,
}

impl AgentScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent, deduplicating by identity label
    ///
    /// Returns `false` if an agent with the same `agent_type()` is already
    /// registered; the original registration wins.
    pub fn register(&mut self, agent: Arc<dyn CachingAgent>) -> bool {
        let label = agent.agent_type();
        if self.agents.contains_key(&label) {
            tracing::warn!(agent = %label, "duplicate agent registration ignored");
            return false;
        }
        self.agents.insert(label, agent);
        true
    }

    /// Identity labels of all registered agents, in stable order
    pub fn registered_types(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Trigger one cycle for every registered agent, concurrently
    ///
    /// Returns per-agent outcomes; failed cycles are logged and reported as
    /// `None`.
    pub async fn run_once(&self) -> Vec<(String, Option<CycleOutcome>)> {
        let cycles = self.agents.iter().map(|(label, agent)| {
            let label = label.clone();
            let agent = agent.clone();
            async move {
                match agent.execute_cycle().await {
                    Ok(outcome) => (label, Some(outcome)),
                    Err(error) => {
                        tracing::warn!(agent = %label, %error, "poll cycle failed");
                        (label, None)
                    }
                }
            }
        });
        join_all(cycles).await
    }

    /// Run cycles forever at the given interval
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}
