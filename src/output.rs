//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each entity (section,
//! project, step) leads with its positional index and title; ids, URLs and
//! other context follow on indented lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sections
//! 001 About (#about, reveal)
//! 002 Services (#services)
//!
//! Projects
//! 001 Notes on the Analytical Engine
//!     URL: https://example.com/notes
//!     Tags: math, engines
//!
//! Contact
//!     Contact (#contact-form) submit "Send message"
//!
//! Behavior
//!     Scroll-spy threshold: 0.40
//!     Reveal threshold: 0.20
//!     Script: none
//! ```
//!
//! ## Render
//!
//! ```text
//! Page → index.html (2 sections, 3 projects)
//! Assets
//!     favicon.svg
//! ```
//!
//! ## Simulate
//!
//! ```text
//! Steps
//! 001 click .nav-toggle (1 handler)
//! 002 submit #contact-form (1 handler, default prevented) → rejected: email
//!
//! State
//!     Nav: open
//!     Active link: none
//!     Banner: error "Please fix the highlighted fields."
//!     Revealed: 0 of 4
//!     Scrolled to: nothing
//!
//! Fields
//!     name: "Ada"
//!     email: "ada@example" (Please enter a valid email address.)
//!     message: "" (This field is required.)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::{MessagesConfig, SiteConfig};
use crate::contact::{Banner, Field, FieldError, SubmitOutcome};
use crate::content::PageContent;
use crate::generate::GenerateReport;
use crate::simulate::Snapshot;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the content and behavior inventory.
pub fn format_check_output(content: &PageContent, config: &SiteConfig, warnings: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Sections".to_string());
    if content.sections.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, section) in content.sections.iter().enumerate() {
        let reveal = if section.reveal { ", reveal" } else { "" };
        lines.push(format!(
            "{} {} (#{}{})",
            format_index(i + 1),
            section.title,
            section.id,
            reveal
        ));
    }

    lines.push(String::new());
    lines.push("Projects".to_string());
    if content.projects.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, project) in content.projects.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), project.title));
        if !project.description.is_empty() {
            lines.push(format!("{}{}", indent(1), truncate_desc(&project.description, 60)));
        }
        if let Some(url) = &project.url {
            lines.push(format!("{}URL: {}", indent(1), url));
        }
        if !project.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), project.tags.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Contact".to_string());
    lines.push(format!(
        "{}{} (#{}) submit \"{}\"",
        indent(1),
        content.contact.heading,
        config.selectors.contact_form,
        content.contact.submit_label
    ));

    lines.push(String::new());
    lines.push("Behavior".to_string());
    lines.push(format!("{}Scroll-spy threshold: {:.2}", indent(1), config.spy.threshold));
    lines.push(format!("{}Reveal threshold: {:.2}", indent(1), config.reveal.threshold));
    lines.push(format!(
        "{}Script: {}",
        indent(1),
        config.page.script.as_deref().unwrap_or("none")
    ));

    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in warnings {
            lines.push(format!("{}{}", indent(1), warning));
        }
    }
    lines
}

pub fn print_check_output(content: &PageContent, config: &SiteConfig, warnings: &[String]) {
    print_lines(format_check_output(content, config, warnings));
}

// ============================================================================
// render
// ============================================================================

/// Format what `render` wrote.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Page \u{2192} index.html ({}, {})",
        plural(report.sections, "section", "sections"),
        plural(report.projects, "project", "projects")
    )];

    if !report.assets.is_empty() {
        lines.push("Assets".to_string());
        for asset in &report.assets {
            lines.push(format!("{}{}", indent(1), asset.display()));
        }
    }
    if !report.warnings.is_empty() {
        lines.push("Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!("{}{}", indent(1), warning));
        }
    }
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    print_lines(format_generate_output(report));
}

// ============================================================================
// validate
// ============================================================================

/// One line per field: `ok` or the message shown to the visitor.
pub fn format_validation(results: &[(Field, Option<FieldError>)], messages: &MessagesConfig) -> Vec<String> {
    results
        .iter()
        .map(|(field, error)| {
            let verdict = error.map_or("ok", |e| e.message(messages));
            format!("{:<8} {}", field.as_str(), verdict)
        })
        .collect()
}

pub fn print_validation(results: &[(Field, Option<FieldError>)], messages: &MessagesConfig) {
    print_lines(format_validation(results, messages));
}

// ============================================================================
// simulate
// ============================================================================

fn format_submit(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Sent => "sent".to_string(),
        SubmitOutcome::Rejected(fields) => {
            let names: Vec<_> = fields.iter().map(|(f, _)| f.as_str()).collect();
            format!("rejected: {}", names.join(", "))
        }
    }
}

/// Format a replay: the steps, then the resulting state.
pub fn format_snapshot(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = vec!["Steps".to_string()];
    if snapshot.steps.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, step) in snapshot.steps.iter().enumerate() {
        let mut line = format!(
            "{} {} ({}",
            format_index(i + 1),
            step.step,
            plural(step.handled, "handler", "handlers")
        );
        if step.default_prevented {
            line.push_str(", default prevented");
        }
        line.push(')');
        if let Some(outcome) = &step.submit {
            line.push_str(&format!(" \u{2192} {}", format_submit(outcome)));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push("State".to_string());
    lines.push(format!(
        "{}Nav: {}",
        indent(1),
        if snapshot.nav_open { "open" } else { "closed" }
    ));
    lines.push(format!(
        "{}Active link: {}",
        indent(1),
        snapshot.active_link.as_deref().unwrap_or("none")
    ));
    let banner = match snapshot.banner {
        None => "no contact form".to_string(),
        Some(Banner::Idle) => "idle".to_string(),
        Some(Banner::Error) => format!("error {:?}", snapshot.status),
        Some(Banner::Success) => format!("success {:?}", snapshot.status),
    };
    lines.push(format!("{}Banner: {}", indent(1), banner));
    lines.push(format!(
        "{}Revealed: {} of {}",
        indent(1),
        snapshot.revealed,
        snapshot.revealed + snapshot.pending_reveal
    ));
    let scrolled = if snapshot.scrolled_to.is_empty() {
        "nothing".to_string()
    } else {
        snapshot.scrolled_to.join(", ")
    };
    lines.push(format!("{}Scrolled to: {}", indent(1), scrolled));

    if !snapshot.fields.is_empty() {
        lines.push(String::new());
        lines.push("Fields".to_string());
        for field in &snapshot.fields {
            let mut line = format!("{}{}: {:?}", indent(1), field.field, field.value);
            if let Some(error) = &field.error {
                line.push_str(&format!(" ({error})"));
            }
            lines.push(line);
        }
    }
    lines
}

pub fn print_snapshot(snapshot: &Snapshot) {
    print_lines(format_snapshot(snapshot));
}

// ============================================================================
// Tests
// ============================================================================
