//! Profile sidebar.

use crate::records::Subject;
use crate::stats::DashboardStats;

use super::{RenderOptions, escape_html, format_number};

pub fn render_sidebar(subject: &Subject, stats: &DashboardStats, options: &RenderOptions) -> String {
    let avatar = subject
        .avatar_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(|url| format!(r#"<img src="{}" alt="Profile" class="avatar">"#, escape_html(url)))
        .unwrap_or_default();

    let rows = [
        ("user-name", "Username", escape_html(&subject.login)),
        ("user-fullname", "Full Name", escape_html(&subject.full_name())),
        ("user-level", "Level", subject.official_level.to_string()),
        ("user-total-xp", "Total XP", format_number(stats.xp.total)),
        ("user-location", "Location", escape_html(&subject.location())),
        ("user-phone", "Phone", escape_html(&subject.phone())),
        ("user-dob", "Date of Birth", escape_html(&subject.date_of_birth())),
        ("user-campus", "Campus", escape_html(&subject.campus_label())),
        ("join-date", "Joined", options.date(&subject.created_at)),
    ];

    let mut html = String::from("<div class=\"user-profile\">\n<h2>User Information</h2>\n");
    html.push_str(&avatar);
    for (class, label, value) in rows {
        html.push_str(&format!(
            "<p class=\"{class}\"><strong>{label}:</strong> {value}</p>\n"
        ));
    }
    html.push_str("</div>\n");
    html.push_str(
        "<form class=\"logout-container\" method=\"post\" action=\"/logout\">\
         <button type=\"submit\" class=\"logout-btn\">Logout</button></form>\n",
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Attributes, PublicProfile};
    use crate::stats::summary::tests::subject;
    use crate::stats::{StatsSettings, XpFilter};
    use serde_json::json;

    #[test]
    fn sidebar_lists_profile_fields() {
        let mut s = subject(Vec::new());
        s.attributes = Attributes::from_value(&json!({"country": "France", "Phone": "0600000000"})).unwrap();
        s.public = PublicProfile {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
        };
        let stats = DashboardStats::compute(&s, &XpFilter::default(), &StatsSettings::default());
        let html = render_sidebar(&s, &stats, &RenderOptions::default());

        assert!(html.contains("<strong>Username:</strong> jdoe"));
        assert!(html.contains("<strong>Full Name:</strong> Jane Doe"));
        assert!(html.contains("<strong>Level:</strong> 12"));
        assert!(html.contains("<strong>Location:</strong> France"));
        assert!(html.contains("<strong>Date of Birth:</strong> Not specified"));
        assert!(html.contains("<strong>Campus:</strong> rouen"));
        assert!(html.contains("Logout"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn sidebar_escapes_platform_text() {
        let mut s = subject(Vec::new());
        s.login = "<script>".to_string();
        let stats = DashboardStats::compute(&s, &XpFilter::default(), &StatsSettings::default());
        let html = render_sidebar(&s, &stats, &RenderOptions::default());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
