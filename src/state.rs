use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::email::{LogMailer, Mailer, SmtpMailer};
use crate::sms::{SmsSender, TwilioSms};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
    /// Only set when SMS reminders are switched on and Twilio is configured.
    pub sms: Option<Arc<dyn SmsSender>>,
}

impl AppState {
    /// Build the services described by `config` around an open pool.
    pub fn new(pool: PgPool, config: Config) -> SharedState {
        let mailer: Arc<dyn Mailer> = match config.smtp.as_ref().map(SmtpMailer::new) {
            Some(Ok(mailer)) => {
                tracing::info!("SMTP mailer configured");
                Arc::new(mailer)
            }
            Some(Err(e)) => {
                tracing::warn!("SMTP not available, falling back to log mailer: {e}");
                Arc::new(LogMailer)
            }
            None => {
                tracing::warn!("SMTP not configured, outgoing mail will only be logged");
                Arc::new(LogMailer)
            }
        };

        let sms: Option<Arc<dyn SmsSender>> = match (config.sms_reminders, &config.twilio) {
            (true, Some(twilio)) => {
                tracing::info!("SMS reminders enabled");
                Some(Arc::new(TwilioSms::new(twilio.clone())))
            }
            (true, None) => {
                tracing::warn!("SMS reminders requested but Twilio is not configured");
                None
            }
            (false, _) => None,
        };

        Arc::new(AppState {
            pool,
            config,
            mailer,
            sms,
        })
    }
}
