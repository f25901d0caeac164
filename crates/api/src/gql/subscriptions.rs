use async_graphql::{Context, Result, Subscription, ID};
use futures_util::Stream;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::gql::error::parse_id;
use crate::gql::types::CalendarRefresh;
use crate::state::AppState;

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Fires after a league schedule at the facility was generated or replaced.
    async fn calendar_updated(
        &self,
        ctx: &Context<'_>,
        facility_id: ID,
    ) -> Result<impl Stream<Item = Result<CalendarRefresh, BroadcastStreamRecvError>>> {
        let state = ctx.data::<AppState>()?;
        let facility_id = parse_id(&facility_id, "facility")?;

        let receiver = state.calendar().subscribe(facility_id);
        Ok(BroadcastStream::new(receiver))
    }
}
