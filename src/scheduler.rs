//! Due-soon reminder scheduler.
//!
//! Fires on a fixed cadence. Each firing is independent: it selects every task
//! whose due date falls inside `[now, now + window]` and dispatches one
//! reminder per task. Nothing is remembered between firings, so a task keeps
//! being reminded about on every firing until it leaves the window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::MAX_REMINDER_WINDOW_SECS;
use crate::db;
use crate::email::Mailer;
use crate::email::templates;
use crate::models::DueTask;
use crate::sms::SmsSender;
use crate::state::SharedState;

/// Inclusive time range a firing selects tasks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DueWindow {
    pub fn starting_at(now: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: now,
            end: now + length,
        }
    }
}

pub struct ReminderScheduler {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    sms: Option<Arc<dyn SmsSender>>,
    interval: std::time::Duration,
    window: Duration,
}

impl ReminderScheduler {
    pub fn new(state: &SharedState) -> Self {
        Self {
            pool: state.pool.clone(),
            mailer: state.mailer.clone(),
            sms: state.sms.clone(),
            interval: std::time::Duration::from_secs(state.config.reminder_interval_secs),
            window: Duration::seconds(
                state
                    .config
                    .reminder_window_secs
                    .clamp(1, MAX_REMINDER_WINDOW_SECS),
            ),
        }
    }

    /// Run one firing as of `now`. Returns the number of reminders dispatched.
    ///
    /// Sends run on their own tasks and are not awaited; a failed send is
    /// logged and never affects the others. Only a failed query fails the
    /// firing.
    pub async fn fire(&self, now: DateTime<Utc>) -> Result<usize, sqlx::Error> {
        let window = DueWindow::starting_at(now, self.window);
        let due = db::tasks::due_between(&self.pool, window.start, window.end).await?;

        tracing::debug!(
            "Reminder firing at {now}: {} task(s) due before {}",
            due.len(),
            window.end
        );

        for task in &due {
            self.dispatch(task);
        }

        Ok(due.len())
    }

    fn dispatch(&self, task: &DueTask) {
        let (subject, body) =
            templates::render_task_reminder(&task.owner_name, &task.title, task.due_date);
        let mailer = self.mailer.clone();
        let to = task.owner_email.clone();
        let task_id = task.task_id;

        tokio::spawn(async move {
            match mailer.send(&to, &subject, &body).await {
                Ok(()) => tracing::info!("Reminder for task {task_id} sent to {to}"),
                Err(e) => tracing::error!("Failed to send reminder for task {task_id} to {to}: {e}"),
            }
        });

        if let (Some(sms), Some(phone)) = (self.sms.clone(), task.owner_phone.clone()) {
            let body = templates::render_task_reminder_sms(&task.title, task.due_date);
            tokio::spawn(async move {
                if let Err(e) = sms.send(&phone, &body).await {
                    tracing::error!("Failed to send SMS reminder for task {task_id}: {e}");
                }
            });
        }
    }

    /// Start the firing loop. It runs until `shutdown` flips to `true`.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(self.interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                "Reminder scheduler started (every {}s, window {}s)",
                self.interval.as_secs(),
                self.window.num_seconds()
            );

            loop {
                if *shutdown.borrow() {
                    break;
                }

                tokio::select! {
                    _ = tick.tick() => {
                        if let Err(e) = self.fire(Utc::now()).await {
                            tracing::error!("Error during reminder firing: {e}");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Reminder scheduler stopped");
        })
    }
}
