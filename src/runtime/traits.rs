//! Trait abstractions for runtime I/O

use crate::content::OutboundItem;
use async_trait::async_trait;
use std::sync::Arc;

/// Delivers outbound items to participants
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one item. For `Wait` the transport sleeps before returning,
    /// which holds back the rest of this session's output.
    async fn deliver(&self, session_id: &str, item: &OutboundItem) -> Result<(), String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn deliver(&self, session_id: &str, item: &OutboundItem) -> Result<(), String> {
        (**self).deliver(session_id, item).await
    }
}
