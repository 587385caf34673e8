//! Roster glue: turns a [`TeamConfig`] into role configurations and runs
//! one agent task per uniform number. The perception source and command
//! sink for each body are supplied by the embedding transport layer.

use futures::future::join_all;
use tokio::sync::broadcast::Sender;
use tokio::task::JoinHandle;
use tracing::info;

use crate::behavior::roles::RoleConfig;
use crate::behavior::Agent;
use crate::commander::Commander;
use crate::config::TeamConfig;
use crate::perception::Perception;

/// Role configurations for every roster slot, with per-slot home overrides
/// applied on top of the built-in role table.
pub fn build_roster(config: &TeamConfig) -> Vec<RoleConfig> {
    config
        .players
        .iter()
        .map(|slot| {
            let role = RoleConfig::for_number(slot.number);
            match slot.home {
                Some(home) => role.with_home(home),
                None => role,
            }
        })
        .collect()
}

/// Spawns one independent agent task. The drop channel aborts in-flight
/// pauses when the embedding process shuts down.
pub fn spawn_agent<C, P>(
    commander: C,
    perception: P,
    role: RoleConfig,
    drop_tx: &Sender<()>,
) -> JoinHandle<()>
where
    C: Commander + Sync + 'static,
    P: Perception + Sync + 'static,
{
    let drop_rx = drop_tx.subscribe();
    let number = role.number;
    tokio::spawn(async move {
        info!(number, "agent task starting");
        let agent = Agent::startup(commander, perception, role, drop_rx).await;
        agent.run().await;
        info!(number, "agent task finished");
    })
}

/// Waits for every agent task to finish (each terminates on its own when
/// its body goes inactive).
pub async fn execute_agents(handles: Vec<JoinHandle<()>>) {
    join_all(handles).await;
}
