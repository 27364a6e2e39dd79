use chrono::{DateTime, Utc};

pub fn format_due(due: DateTime<Utc>) -> String {
    due.format("%b %-d, %Y %H:%M UTC").to_string()
}

/// Subject and body of the password reset mail.
pub fn render_password_reset(reset_url: &str, token: &str) -> (String, String) {
    let subject = "Password Reset Link".to_string();
    let body = format!(
        "You requested a password reset. Please click the following link to reset your password:\n\n\
         {reset_url}?token={token}\n\n\
         The link will expire in 1 hour."
    );
    (subject, body)
}

/// Subject and body of a due-soon reminder.
pub fn render_task_reminder(name: &str, title: &str, due: DateTime<Utc>) -> (String, String) {
    let subject = format!("Reminder: Task \"{title}\" is due soon!");
    let body = format!(
        "Hello {name},\n\n\
         This is a reminder that your task \"{title}\" is due at {}.\n\n\
         Please complete it on time!",
        format_due(due)
    );
    (subject, body)
}

pub fn render_task_reminder_sms(title: &str, due: DateTime<Utc>) -> String {
    format!("Reminder: Task \"{title}\" is due at {}.", format_due(due))
}
