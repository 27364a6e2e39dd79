use std::net::IpAddr;

/// Thirty days.
pub const MAX_REMINDER_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub reset_url: String,
    pub reminder_interval_secs: u64,
    pub reminder_window_secs: i64,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
    pub sms_reminders: bool,
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let host: IpAddr = or("TASKIFY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TASKIFY_HOST: {e}"))?;

        let port: u16 = or("TASKIFY_PORT", "5001")
            .parse()
            .map_err(|e| format!("Invalid TASKIFY_PORT: {e}"))?;

        let reset_url = or("TASKIFY_RESET_URL", "http://localhost:3000/reset-password");

        let reminder_interval_secs: u64 = or("TASKIFY_REMINDER_INTERVAL_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid TASKIFY_REMINDER_INTERVAL_SECS: {e}"))?;
        if reminder_interval_secs == 0 {
            return Err("TASKIFY_REMINDER_INTERVAL_SECS must be greater than zero".to_string());
        }

        let reminder_window_secs: i64 = or("TASKIFY_REMINDER_WINDOW_SECS", "3600")
            .parse()
            .map_err(|e| format!("Invalid TASKIFY_REMINDER_WINDOW_SECS: {e}"))?;
        if !(1..=MAX_REMINDER_WINDOW_SECS).contains(&reminder_window_secs) {
            return Err(format!(
                "TASKIFY_REMINDER_WINDOW_SECS must be between 1 and {MAX_REMINDER_WINDOW_SECS}"
            ));
        }

        let log_level = or("TASKIFY_LOG_LEVEL", "info");

        let smtp = match (lookup("TASKIFY_SMTP_USER"), lookup("TASKIFY_SMTP_PASS")) {
            (Some(user), Some(pass)) => Some(SmtpConfig {
                host: or("TASKIFY_SMTP_HOST", "smtp.gmail.com"),
                port: or("TASKIFY_SMTP_PORT", "587")
                    .parse()
                    .map_err(|e| format!("Invalid TASKIFY_SMTP_PORT: {e}"))?,
                from: lookup("TASKIFY_SMTP_FROM").unwrap_or_else(|| user.clone()),
                user,
                pass,
            }),
            _ => None,
        };

        let sms_reminders = matches!(
            or("TASKIFY_SMS_REMINDERS", "false").as_str(),
            "true" | "1" | "yes"
        );

        let twilio = match (
            lookup("TWILIO_ACCOUNT_SID"),
            lookup("TWILIO_AUTH_TOKEN"),
            lookup("TWILIO_PHONE_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            reset_url,
            reminder_interval_secs,
            reminder_window_secs,
            log_level,
            smtp,
            sms_reminders,
            twilio,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let config = load(&[("DATABASE_URL", "postgres://x/y"), ("JWT_SECRET", "s")]).unwrap();
        assert_eq!(config.port, 5001);
        assert_eq!(config.reminder_interval_secs, 60);
        assert_eq!(config.reminder_window_secs, 3600);
        assert!(config.smtp.is_none());
        assert!(!config.sms_reminders);
        assert!(config.twilio.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = load(&[("DATABASE_URL", "postgres://x/y")]).unwrap_err();
        assert!(err.contains("JWT_SECRET"));
    }

    #[test]
    fn smtp_from_defaults_to_user() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x/y"),
            ("JWT_SECRET", "s"),
            ("TASKIFY_SMTP_USER", "me@example.com"),
            ("TASKIFY_SMTP_PASS", "pw"),
        ])
        .unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.gmail.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from, "me@example.com");
    }

    #[test]
    fn reminder_window_must_be_positive_and_bounded() {
        for value in ["0", "-60", "9223372036854775807"] {
            let err = load(&[
                ("DATABASE_URL", "postgres://x/y"),
                ("JWT_SECRET", "s"),
                ("TASKIFY_REMINDER_WINDOW_SECS", value),
            ])
            .unwrap_err();
            assert!(err.starts_with("TASKIFY_REMINDER_WINDOW_SECS must be between"), "{value}: {err}");
        }

        let config = load(&[
            ("DATABASE_URL", "postgres://x/y"),
            ("JWT_SECRET", "s"),
            ("TASKIFY_REMINDER_WINDOW_SECS", "2592000"),
        ])
        .unwrap();
        assert_eq!(config.reminder_window_secs, MAX_REMINDER_WINDOW_SECS);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://x/y"),
            ("JWT_SECRET", "s"),
            ("TASKIFY_PORT", "not-a-port"),
        ])
        .unwrap_err();
        assert!(err.starts_with("Invalid TASKIFY_PORT"));
    }
}
