use chrono::{DateTime, Utc};
use nettu_notifier_domain::Stats;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Counters {
    events_processed: u64,
    notifications_sent: u64,
    reminders_scheduled: u64,
    errors: u64,
}

/// Process wide pipeline counters, reset only by a restart
#[derive(Debug)]
pub struct StatsCounters {
    counters: Mutex<Counters>,
    start_time: DateTime<Utc>,
}

impl StatsCounters {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            start_time,
        }
    }

    fn update<F: FnOnce(&mut Counters)>(&self, update: F) {
        let mut counters = self.counters.lock().unwrap();
        update(&mut counters);
    }

    pub fn event_processed(&self) {
        self.update(|c| c.events_processed += 1);
    }

    pub fn notification_sent(&self) {
        self.update(|c| c.notifications_sent += 1);
    }

    pub fn reminder_scheduled(&self) {
        self.update(|c| c.reminders_scheduled += 1);
    }

    pub fn error(&self) {
        self.update(|c| c.errors += 1);
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// All counters read under the same lock
    pub fn snapshot(&self) -> Stats {
        let counters = self.counters.lock().unwrap();
        Stats {
            events_processed: counters.events_processed,
            notifications_sent: counters.notifications_sent,
            reminders_scheduled: counters.reminders_scheduled,
            errors: counters.errors,
            start_time: self.start_time,
        }
    }
}
