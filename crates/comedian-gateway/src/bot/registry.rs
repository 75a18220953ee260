//! Registry of running bots
//!
//! Uses DashMap keyed by team id; a workspace has at most one bot.

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Tasks of one running bot and the switch that stops them
pub struct BotHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl BotHandle {
    pub fn new(shutdown: watch::Sender<bool>, tasks: Vec<JoinHandle<()>>) -> Self {
        Self { shutdown, tasks }
    }

    /// Signal shutdown and wait for every task to finish
    pub async fn stop(self) {
        // receivers already gone means the tasks have exited
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Bot task ended abnormally");
            }
        }
    }
}

#[derive(Default)]
pub struct BotRegistry {
    bots: DashMap<String, BotHandle>,
}

impl BotRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a bot, stopping any bot it replaces
    pub async fn register(&self, team_id: impl Into<String>, handle: BotHandle) {
        let team_id = team_id.into();
        let replaced = self.bots.insert(team_id.clone(), handle);
        if let Some(old) = replaced {
            info!(team_id = %team_id, "Replacing running bot");
            old.stop().await;
        }
        debug!(team_id = %team_id, "Bot registered");
    }

    /// Stop and forget a bot; false when none was running
    pub async fn remove(&self, team_id: &str) -> bool {
        match self.bots.remove(team_id) {
            Some((_, handle)) => {
                handle.stop().await;
                info!(team_id, "Bot removed");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, team_id: &str) -> bool {
        self.bots.contains_key(team_id)
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub async fn shutdown_all(&self) {
        let teams: Vec<String> = self.bots.iter().map(|entry| entry.key().clone()).collect();
        for team_id in teams {
            self.remove(&team_id).await;
        }
    }
}
