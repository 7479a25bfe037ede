use crate::domain_model::BuddyEvent;

#[async_trait::async_trait]
pub trait BuddyEventSink: Send + Sync {
    async fn publish(&self, event: &BuddyEvent) -> anyhow::Result<()>;
}
