use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::gql::types::CalendarRefresh;

const CHANNEL_CAPACITY: usize = 100;

/// Per-facility broadcast channels telling calendar views to reload.
#[derive(Clone, Default)]
pub struct CalendarEvents {
    facilities: Arc<Mutex<HashMap<Uuid, broadcast::Sender<CalendarRefresh>>>>,
}

impl CalendarEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, facility_id: Uuid) -> broadcast::Receiver<CalendarRefresh> {
        let mut facilities = self.facilities.lock();
        facilities
            .entry(facility_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, facility_id: Uuid, event: CalendarRefresh) -> usize {
        let mut facilities = self.facilities.lock();
        let Some(sender) = facilities.get(&facility_id) else {
            return 0;
        };

        match sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                // Nobody listening any more; drop the channel.
                facilities.remove(&facility_id);
                0
            }
        }
    }
}
