use crate::error::ServiceResult;
use async_trait::async_trait;
use core_types::Event;

/// The only piece of the event service the reservation service depends on.
#[async_trait]
pub trait EventLookup: Send + Sync {
    /// Resolves an event or fails with the same error the event detail
    /// operation would produce.
    async fn get_event_by_id(&self, id: i64) -> ServiceResult<Event>;
}
