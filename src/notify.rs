use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::models::GameContext;

/// Outbound messaging capability the engine calls into; implemented by the
/// chat-platform collaborator. Both operations are best-effort from the
/// engine's point of view: a slow or failing delivery never fails the
/// command that triggered it, and all calls happen after the per-game
/// exclusive section has been released.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a private message to one user
    async fn send_private(&self, user_id: i64, text: &str) -> anyhow::Result<()>;

    /// Re-render the public status view for a game from a committed snapshot
    async fn refresh_public_view(&self, game_id: Uuid, context: &GameContext);
}

/// Which private messages made it out. Failures are logged where they
/// happen; this report lets the caller surface "couldn't DM these players"
/// without treating it as a command failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryReport {
    pub delivered: Vec<i64>,
    pub failed: Vec<i64>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fan a batch of private messages out concurrently and collect the report
pub async fn send_all(notifier: &dyn Notifier, messages: &[(i64, String)]) -> DeliveryReport {
    let sends = messages
        .iter()
        .map(|(user_id, text)| async move {
            match notifier.send_private(*user_id, text).await {
                Ok(()) => (*user_id, true),
                Err(e) => {
                    tracing::warn!("Failed to deliver private message to {}: {}", user_id, e);
                    (*user_id, false)
                }
            }
        });

    let mut report = DeliveryReport::default();
    for (user_id, ok) in join_all(sends).await {
        if ok {
            report.delivered.push(user_id);
        } else {
            report.failed.push(user_id);
        }
    }
    report
}
