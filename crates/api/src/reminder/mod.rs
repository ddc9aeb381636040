mod find_due_reminders;
mod fire_reminder;
mod schedule_reminder;

pub use find_due_reminders::FindDueRemindersUseCase;
pub use fire_reminder::FireReminderUseCase;
pub use schedule_reminder::ScheduleReminderUseCase;
