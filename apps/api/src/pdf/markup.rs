//! HTML document tree for the resume renderer.
//!
//! The layout is deterministic and order-preserving: sections render only
//! when non-empty, contact fields join with " | " omitting absent values,
//! and descriptions split on line breaks into individual bullet points.
//! CSS is kept deliberately simple — complex layout rules are not reliably
//! supported by the HTML-to-PDF path.

use crate::models::resume::{Contact, ResumeRecord};

const STYLESHEET: &str = "\
body { font-family: sans-serif; font-size: 10pt; color: #333333; }\n\
h1 { font-size: 24pt; color: #008080; text-align: center; margin-bottom: 4px; }\n\
h2 { font-size: 14pt; color: #008080; border-bottom: 1px solid #DDDDDD; margin-top: 15px; margin-bottom: 8px; }\n\
p.contact { font-size: 9pt; color: #555555; text-align: center; margin: 2px; }\n\
p.summary { font-style: italic; }\n\
p.title { font-size: 11pt; font-weight: bold; margin-bottom: 0; }\n\
p.affiliation { font-style: italic; margin: 0; }\n\
p.dates { font-size: 9pt; color: #666666; margin: 0 0 2px 0; }\n\
ul { margin: 2px 0 10px 10px; }\n\
span.badge { background-color: #E0E0E0; font-size: 9pt; padding: 2px 4px; }\n\
a { color: #008080; }";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Email, phone, address — present fields joined with " | ".
pub fn contact_line(contact: &Contact) -> String {
    let mut parts = vec![contact.email.as_str()];
    parts.extend(opt(&contact.phone));
    parts.extend(opt(&contact.address));
    parts
        .iter()
        .map(|p| escape_html(p))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// LinkedIn / GitHub / Portfolio anchors, each rendered only if present.
pub fn links_line(contact: &Contact) -> Option<String> {
    let labeled = [
        ("LinkedIn", opt(&contact.linkedin)),
        ("GitHub", opt(&contact.github)),
        ("Portfolio", opt(&contact.portfolio)),
    ];
    let links: Vec<String> = labeled
        .iter()
        .filter_map(|(label, url)| {
            url.map(|u| format!("<a href=\"{}\">{}</a>", escape_html(u), label))
        })
        .collect();
    if links.is_empty() {
        None
    } else {
        Some(links.join(" | "))
    }
}

/// Splits text on line breaks into one `<li>` per line. Every split piece
/// becomes a bullet, matching the document's historical rendering.
fn bullet_list(text: &str) -> String {
    let mut html = String::from("<ul>");
    for line in text.split('\n') {
        html.push_str(&format!("<li>{}</li>", escape_html(line)));
    }
    html.push_str("</ul>");
    html
}

/// Builds the full HTML document tree for a record. Assumes the assembly
/// preconditions (non-empty name/email, non-blank summary) already hold.
pub fn resume_html(record: &ResumeRecord) -> String {
    let name = escape_html(record.contact.full_name.trim());
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head>");
    html.push_str(&format!("<title>{name} - Resume</title>"));
    html.push_str(&format!("<style>{STYLESHEET}</style>"));
    html.push_str("</head><body>");

    // Header
    html.push_str(&format!("<h1>{name}</h1>"));
    html.push_str(&format!(
        "<p class=\"contact\">{}</p>",
        contact_line(&record.contact)
    ));
    if let Some(links) = links_line(&record.contact) {
        html.push_str(&format!("<p class=\"contact\">{links}</p>"));
    }

    // Summary
    if !record.summary.trim().is_empty() {
        html.push_str("<h2>Summary</h2>");
        html.push_str(&format!(
            "<p class=\"summary\">{}</p>",
            escape_html(&record.summary)
        ));
    }

    // Experience
    if !record.experience.is_empty() {
        html.push_str("<h2>Work Experience</h2>");
        for exp in &record.experience {
            html.push_str(&format!(
                "<p class=\"title\">{}</p>",
                escape_html(&exp.job_title)
            ));
            let mut affiliation = escape_html(&exp.company);
            if let Some(location) = opt(&exp.location) {
                affiliation.push_str(&format!(", {}", escape_html(location)));
            }
            html.push_str(&format!("<p class=\"affiliation\">{affiliation}</p>"));
            html.push_str(&format!(
                "<p class=\"dates\">{}</p>",
                escape_html(&exp.date_range())
            ));
            html.push_str(&bullet_list(&exp.description));
        }
    }

    // Education
    if !record.education.is_empty() {
        html.push_str("<h2>Education</h2>");
        for edu in &record.education {
            html.push_str(&format!(
                "<p class=\"title\">{}</p>",
                escape_html(&edu.degree)
            ));
            let mut affiliation = escape_html(&edu.institution);
            if let Some(location) = opt(&edu.location) {
                affiliation.push_str(&format!(", {}", escape_html(location)));
            }
            html.push_str(&format!("<p class=\"affiliation\">{affiliation}</p>"));
            html.push_str(&format!(
                "<p class=\"dates\">Graduated: {}</p>",
                escape_html(&edu.graduation_date)
            ));
            if let Some(details) = opt(&edu.details) {
                html.push_str(&bullet_list(details));
            }
        }
    }

    // Skills
    if !record.skills.is_empty() {
        html.push_str("<h2>Skills</h2><p>");
        let badges: Vec<String> = record
            .skills
            .iter()
            .map(|s| format!("<span class=\"badge\">{}</span>", escape_html(&s.name)))
            .collect();
        html.push_str(&badges.join(" "));
        html.push_str("</p>");
    }

    // Projects
    if !record.projects.is_empty() {
        html.push_str("<h2>Projects</h2>");
        for project in &record.projects {
            html.push_str(&format!(
                "<p class=\"title\">{}</p>",
                escape_html(&project.name)
            ));
            if let Some(technologies) = opt(&project.technologies) {
                html.push_str(&format!(
                    "<p class=\"affiliation\">Technologies: {}</p>",
                    escape_html(technologies)
                ));
            }
            html.push_str(&bullet_list(&project.description));
            if let Some(link) = opt(&project.link) {
                html.push_str(&format!(
                    "<p><a href=\"{}\">Project Link</a></p>",
                    escape_html(link)
                ));
            }
        }
    }

    html.push_str("</body></html>");
    html
}
