use nettu_notifier_domain::ReminderJob;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Hands freshly scheduled reminders to the running reminders job so their
/// timer is armed without waiting for the next poll of the store.
#[derive(Clone)]
pub struct ReminderQueue {
    sender: UnboundedSender<ReminderJob>,
    receiver: Arc<Mutex<Option<UnboundedReceiver<ReminderJob>>>>,
}

impl ReminderQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(Some(receiver))),
        }
    }

    /// Returns false when nobody is consuming the queue
    pub fn arm(&self, reminder: ReminderJob) -> bool {
        self.sender.send(reminder).is_ok()
    }

    /// The receiving end can only be taken once
    pub fn take_receiver(&self) -> Option<UnboundedReceiver<ReminderJob>> {
        self.receiver.lock().unwrap().take()
    }
}

impl Default for ReminderQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use nettu_notifier_domain::{CalendarEvent, CalendarEventKind};

    #[tokio::test]
    async fn delivers_armed_reminders_to_the_single_receiver() {
        let queue = ReminderQueue::new();
        let mut receiver = queue.take_receiver().expect("Receiver to be available");
        assert!(queue.take_receiver().is_none());

        let start_time = Utc::now() + Duration::hours(1);
        let event = CalendarEvent {
            id: "evt_1".into(),
            title: "Standup".into(),
            description: None,
            start_time,
            end_time: start_time + Duration::minutes(15),
            owner_id: "user_1".into(),
            kind: CalendarEventKind::Created,
        };
        let reminder = ReminderJob::new(&event, Utc::now().timestamp_millis()).unwrap();
        assert!(queue.clone().arm(reminder.clone()));
        assert_eq!(receiver.recv().await, Some(reminder.clone()));

        drop(receiver);
        assert!(!queue.arm(reminder));
    }
}
