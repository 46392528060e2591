//! Notification Dispatcher — composes and sends the two post-submission
//! emails on a detached task.
//!
//! Delivery is best-effort with a single attempt: transport failures are
//! logged and swallowed, never surfaced to the submitter, and the Lead
//! row stays the durable source of truth either way.

use std::sync::Arc;

use tracing::{error, info};

use crate::mailer::{MailTransport, OutboundEmail};
use crate::models::lead::Lead;

pub const PROSPECT_SUBJECT: &str = "Application Received";
pub const INTERNAL_SUBJECT: &str = "New Lead Received";

pub struct Notifier {
    mailer: Arc<dyn MailTransport>,
    attorney_email: Option<String>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn MailTransport>, attorney_email: Option<String>) -> Self {
        Notifier {
            mailer,
            attorney_email,
        }
    }

    /// Sends the prospect confirmation, then the internal notification,
    /// in that fixed order.
    ///
    /// When no internal recipient is configured, neither email goes out.
    /// That matches the historical behavior of the service; whether the
    /// prospect should still be notified in that case is an open product
    /// question, so the coupling is preserved rather than silently fixed.
    pub async fn send_new_lead_emails(&self, lead: &Lead) {
        let Some(attorney) = self.attorney_email.as_deref() else {
            info!("ATTORNEY_EMAIL not set; skipping notification emails for lead {}", lead.id);
            return;
        };

        let prospect = OutboundEmail {
            to: lead.email.clone(),
            subject: PROSPECT_SUBJECT.to_string(),
            html_body: prospect_body(&lead.first_name),
        };
        if let Err(e) = self.mailer.send(prospect).await {
            error!("Failed to send prospect confirmation for lead {}: {e}", lead.id);
            return;
        }

        let internal = OutboundEmail {
            to: attorney.to_string(),
            subject: INTERNAL_SUBJECT.to_string(),
            html_body: internal_body(lead),
        };
        if let Err(e) = self.mailer.send(internal).await {
            error!("Failed to send internal notification for lead {}: {e}", lead.id);
            return;
        }

        info!("Notification emails sent for lead {}", lead.id);
    }
}

fn prospect_body(first_name: &str) -> String {
    format!(
        r#"<html>
<body>
    <h2>Thank you for your application, {first_name}!</h2>
    <p>We have successfully received your information and resume.</p>
    <p>Our team will review your application and an attorney will reach out to you shortly.</p>
    <p>Best regards,<br>Lead Tracking Service</p>
</body>
</html>"#
    )
}

fn internal_body(lead: &Lead) -> String {
    format!(
        r#"<html>
<body>
    <h2>New Lead Submission</h2>
    <p>A new lead has submitted their information:</p>
    <ul>
        <li><strong>Name:</strong> {} {}</li>
        <li><strong>Email:</strong> {}</li>
        <li><strong>Resume Path:</strong> {}</li>
    </ul>
    <p>Please review and update status as needed.</p>
</body>
</html>"#,
        lead.first_name, lead.last_name, lead.email, lead.resume_path
    )
}
