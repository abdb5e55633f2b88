//! # Admin Dashboard
//!
//! Per-event summary behind `ADMIN_KEY`, passed as `?key=`.
//!
//! All totals are computed in memory over the full listing for the slug. A wrong or missing key
//! renders the "Admin Access Required" page instead of an error status.

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    database::Store,
    error::AppError,
    listing::{list_pledges, list_rsvps},
    models::{Pledge, Rsvp, RsvpStatus},
};

pub struct StatusPartition<'a> {
    pub accepted: Vec<&'a Rsvp>,
    pub declined: Vec<&'a Rsvp>,
    pub maybe: Vec<&'a Rsvp>,
}

fn with_status(rsvps: &[Rsvp], status: RsvpStatus) -> Vec<&Rsvp> {
    rsvps.iter().filter(|r| r.status == status).collect()
}

pub fn partition(rsvps: &[Rsvp]) -> StatusPartition<'_> {
    StatusPartition {
        accepted: with_status(rsvps, RsvpStatus::Accept),
        declined: with_status(rsvps, RsvpStatus::Decline),
        maybe: with_status(rsvps, RsvpStatus::Maybe),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub rsvp_count: usize,
    pub accepted: usize,
    pub declined: usize,
    pub maybe: usize,
    /// Guests on accepted RSVPs only.
    pub total_guests: u64,
    pub pledge_count: usize,
    pub total_pledged: f64,
}

pub fn summarize(rsvps: &[Rsvp], pledges: &[Pledge]) -> EventSummary {
    let partition = partition(rsvps);

    EventSummary {
        rsvp_count: rsvps.len(),
        accepted: partition.accepted.len(),
        declined: partition.declined.len(),
        maybe: partition.maybe.len(),
        total_guests: partition.accepted.iter().map(|r| r.guests as u64).sum(),
        pledge_count: pledges.len(),
        total_pledged: pledges.iter().map(|p| p.amount).sum(),
    }
}

/// An unset admin key never matches.
pub fn admin_key_matches(config: &Config, key: Option<&str>) -> bool {
    !config.admin_key.is_empty() && key == Some(config.admin_key.as_str())
}

pub async fn admin_page(
    store: &dyn Store,
    config: &Config,
    slug: &str,
    key: Option<&str>,
) -> Result<Option<String>, AppError> {
    if !admin_key_matches(config, key) {
        return Ok(None);
    }

    let (rsvps, pledges) = tokio::try_join!(list_rsvps(store, slug), list_pledges(store, slug))?;

    Ok(Some(render_dashboard(slug, &rsvps, &pledges)))
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

pub fn render_denied(slug: &str) -> String {
    let body = format!(
        "<main>\n<h1>Admin Access Required</h1>\n\
         <p>Set <code>ADMIN_KEY</code> in the server environment, then open:</p>\n\
         <pre><code>/admin/events/{}?key=YOUR_ADMIN_KEY</code></pre>\n</main>\n",
        escape(slug)
    );

    page("Admin Access Required", &body)
}

fn rsvp_row(rsvp: &Rsvp) -> String {
    format!(
        "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&rsvp.full_name),
        rsvp.status.as_str().to_lowercase(),
        rsvp.status,
        rsvp.guests,
        escape(rsvp.phone.as_deref().unwrap_or_default()),
        escape(rsvp.message.as_deref().unwrap_or_default()),
        format_date(&rsvp.created_at),
    )
}

fn pledge_row(pledge: &Pledge) -> String {
    format!(
        "<tr><td>{}</td><td>${}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&pledge.full_name),
        pledge.amount,
        escape(&pledge.currency),
        escape(pledge.phone.as_deref().unwrap_or_default()),
        escape(pledge.note.as_deref().unwrap_or_default()),
        format_date(&pledge.created_at),
    )
}

fn rows<T>(items: &[T], row: fn(&T) -> String, empty: &str) -> String {
    if items.is_empty() {
        return format!("<tr><td colspan=\"6\">{empty}</td></tr>\n");
    }

    items.iter().map(row).collect()
}

pub fn render_dashboard(slug: &str, rsvps: &[Rsvp], pledges: &[Pledge]) -> String {
    let summary = summarize(rsvps, pledges);

    let chips: String = [
        format!("RSVPs: {}", summary.rsvp_count),
        format!("Accepted: {}", summary.accepted),
        format!("Declined: {}", summary.declined),
        format!("Maybe: {}", summary.maybe),
        format!("Guests (accepted): {}", summary.total_guests),
        format!("Pledges: {}", summary.pledge_count),
        format!("Total pledged: ${}", summary.total_pledged),
    ]
    .iter()
    .map(|chip| format!("<span class=\"chip\">{}</span>\n", escape(chip)))
    .collect();

    let body = format!(
        "<main>\n<h1>Admin Dashboard</h1>\n<p>Event: <b>{}</b></p>\n\
         <section class=\"summary\">\n{chips}</section>\n\
         <h2>RSVPs</h2>\n<table>\n<thead><tr><th>Name</th><th>Status</th><th>Guests</th>\
         <th>Phone</th><th>Message</th><th>Created</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>\n\
         <h2>Pledges</h2>\n<table>\n<thead><tr><th>Name</th><th>Amount</th><th>Currency</th>\
         <th>Phone</th><th>Note</th><th>Created</th></tr></thead>\n<tbody>\n{}</tbody>\n</table>\n\
         </main>\n",
        escape(slug),
        rows(rsvps, rsvp_row, "No RSVPs yet."),
        rows(pledges, pledge_row, "No pledges yet."),
    );

    page(&format!("Admin: {slug}"), &body)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn rsvp(status: RsvpStatus, guests: u32) -> Rsvp {
        let now = Utc::now();

        Rsvp {
            id: "id".to_string(),
            event_slug: "slug".to_string(),
            full_name: "Guest".to_string(),
            status,
            guests,
            phone: None,
            message: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn pledge(amount: f64) -> Pledge {
        let now = Utc::now();

        Pledge {
            id: "id".to_string(),
            event_slug: "slug".to_string(),
            full_name: "Donor".to_string(),
            amount,
            currency: "USD".to_string(),
            phone: None,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_guests_from_accepted_only() {
        let rsvps = vec![
            rsvp(RsvpStatus::Accept, 2),
            rsvp(RsvpStatus::Accept, 3),
            rsvp(RsvpStatus::Decline, 5),
            rsvp(RsvpStatus::Maybe, 1),
        ];

        let summary = summarize(&rsvps, &[]);
        assert_eq!(summary.total_guests, 5);
        assert_eq!(summary.rsvp_count, 4);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.declined, 1);
        assert_eq!(summary.maybe, 1);
    }

    #[test]
    fn test_total_pledged() {
        let summary = summarize(&[], &[pledge(50.0), pledge(25.5)]);

        assert_eq!(summary.total_pledged, 75.5);
        assert_eq!(summary.pledge_count, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[], &[]);

        assert_eq!(summary.total_guests, 0);
        assert_eq!(summary.total_pledged, 0.0);
    }

    #[test]
    fn test_admin_key() {
        let mut config = Config::default();
        assert!(!admin_key_matches(&config, Some("")));
        assert!(!admin_key_matches(&config, None));

        config.admin_key = "secret".to_string();
        assert!(admin_key_matches(&config, Some("secret")));
        assert!(!admin_key_matches(&config, Some("Secret")));
        assert!(!admin_key_matches(&config, None));
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_dashboard_rendering() {
        let mut hostile = rsvp(RsvpStatus::Accept, 2);
        hostile.full_name = "<b>Eve</b>".to_string();

        let html = render_dashboard("slug", &[hostile], &[pledge(50.0), pledge(25.5)]);

        assert!(html.contains("Guests (accepted): 2"));
        assert!(html.contains("Total pledged: $75.5"));
        assert!(html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(!html.contains("<b>Eve</b>"));
        assert!(!html.contains("No pledges yet."));
        assert!(!html.contains("No RSVPs yet."));
        assert!(html.contains("<td class=\"accept\">ACCEPT</td>"));
        assert_eq!(html.matches("<span class=\"chip\">").count(), 7);
        assert_eq!(html.matches("<tr><td>").count(), 3);
        assert_eq!(html.matches("</tbody>\n</table>").count(), 2);
    }

    #[test]
    fn test_empty_dashboard() {
        let html = render_dashboard("slug", &[], &[]);

        assert!(html.contains("No RSVPs yet."));
        assert!(html.contains("No pledges yet."));
    }

    #[test]
    fn test_denied_page() {
        let html = render_denied("peruth-innocent");

        assert!(html.contains("Admin Access Required"));
        assert!(html.contains("/admin/events/peruth-innocent?key=YOUR_ADMIN_KEY"));
    }
}
