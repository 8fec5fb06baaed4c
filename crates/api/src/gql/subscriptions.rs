use async_graphql::{Context, Result, Subscription};
use futures_util::Stream;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use uuid::Uuid;

use crate::auth::permissions::{require_auth, require_role};
use crate::gql::types::{ActivityLogEntry, Role, SlotUpdateEvent, UserNotification};

const CHANNEL_CAPACITY: usize = 100;

/// All subscription channels
struct SubscriptionChannels {
    /// Per-club class updates (bookings, fills, courts, cancellations)
    clubs: HashMap<Uuid, broadcast::Sender<SlotUpdateEvent>>,
    /// Per-slot activity log entries
    slots: HashMap<Uuid, broadcast::Sender<ActivityLogEntry>>,
    /// Per-user notification channels
    users: HashMap<Uuid, broadcast::Sender<UserNotification>>,
}

impl SubscriptionChannels {
    fn new() -> Self {
        Self {
            clubs: HashMap::new(),
            slots: HashMap::new(),
            users: HashMap::new(),
        }
    }

    fn open_count(&self) -> usize {
        self.clubs.len() + self.slots.len() + self.users.len()
    }

    fn get_or_create_club(&mut self, club_id: Uuid) -> &broadcast::Sender<SlotUpdateEvent> {
        self.clubs
            .entry(club_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
    }

    fn get_or_create_slot(&mut self, slot_id: Uuid) -> &broadcast::Sender<ActivityLogEntry> {
        self.slots
            .entry(slot_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
    }

    fn get_or_create_user(&mut self, user_id: Uuid) -> &broadcast::Sender<UserNotification> {
        self.users
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
    }
}

static CHANNELS: Lazy<Arc<Mutex<SubscriptionChannels>>> =
    Lazy::new(|| Arc::new(Mutex::new(SubscriptionChannels::new())));

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Live class changes for a club (calendar and booking screens)
    async fn slot_updates(
        &self,
        club_id: Uuid,
    ) -> Result<impl Stream<Item = Result<SlotUpdateEvent, BroadcastStreamRecvError>>> {
        let receiver = CHANNELS.lock().get_or_create_club(club_id).subscribe();
        Ok(BroadcastStream::new(receiver))
    }

    /// Activity log entries of a class as they are written (instructors and admins)
    async fn slot_activity(
        &self,
        ctx: &Context<'_>,
        time_slot_id: Uuid,
    ) -> Result<impl Stream<Item = Result<ActivityLogEntry, BroadcastStreamRecvError>>> {
        require_role(ctx, Role::Instructor)?;

        let receiver = CHANNELS.lock().get_or_create_slot(time_slot_id).subscribe();
        Ok(BroadcastStream::new(receiver))
    }

    /// Subscribe to user-specific notifications (requires authentication)
    async fn user_notifications(
        &self,
        ctx: &Context<'_>,
    ) -> Result<impl Stream<Item = Result<UserNotification, BroadcastStreamRecvError>>> {
        let user = require_auth(ctx)?;

        let receiver = CHANNELS.lock().get_or_create_user(user.id).subscribe();
        Ok(BroadcastStream::new(receiver))
    }
}

// ============================================================================
// Publish functions - send events to specific channels
// ============================================================================

/// Sends to an existing channel only. A channel whose last receiver is gone is dropped.
fn send_to<T: Clone>(senders: &mut HashMap<Uuid, broadcast::Sender<T>>, key: Uuid, event: T) {
    let Some(sender) = senders.get(&key) else {
        return;
    };
    if sender.send(event).is_err() {
        senders.remove(&key);
    }
}

pub fn publish_slot_update(event: SlotUpdateEvent) {
    let club_id = match Uuid::parse_str(event.club_id.as_str()) {
        Ok(id) => id,
        Err(_) => return,
    };

    send_to(&mut CHANNELS.lock().clubs, club_id, event);
}

pub fn publish_activity_event(time_slot_id: Uuid, entry: ActivityLogEntry) {
    send_to(&mut CHANNELS.lock().slots, time_slot_id, entry);
}

/// Publish a notification to a specific user's channel
pub fn publish_user_notification(notification: UserNotification) {
    let user_id = match Uuid::parse_str(notification.user_id.as_str()) {
        Ok(id) => id,
        Err(_) => return,
    };

    send_to(&mut CHANNELS.lock().users, user_id, notification);
}

/// Drops the activity channel of a class nobody can book anymore.
pub fn cleanup_slot_channel(time_slot_id: Uuid) {
    CHANNELS.lock().slots.remove(&time_slot_id);
}

/// Removes every channel without receivers and returns how many went.
pub fn prune_idle_channels() -> usize {
    let mut channels = CHANNELS.lock();
    let before = channels.open_count();
    channels.clubs.retain(|_, tx| tx.receiver_count() > 0);
    channels.slots.retain(|_, tx| tx.receiver_count() > 0);
    channels.users.retain(|_, tx| tx.receiver_count() > 0);
    before - channels.open_count()
}

/// Number of open channels keyed by `id` across clubs, classes and users.
pub fn open_channels_for(id: Uuid) -> usize {
    let channels = CHANNELS.lock();
    usize::from(channels.clubs.contains_key(&id))
        + usize::from(channels.slots.contains_key(&id))
        + usize::from(channels.users.contains_key(&id))
}
