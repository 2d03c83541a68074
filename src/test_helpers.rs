//! Shared test utilities for the showcase test suite.
//!
//! Provides the standard page markup as an in-memory [`Document`] with handles
//! to every element the components care about, plus fixture setup for the
//! render pipeline.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut fixture = standard_page();
//! fill_valid(&mut fixture);
//! let mut page = ready(fixture.doc);
//! let outcome = page.dispatch(EventKind::Submit, &fixture.form);
//! assert_eq!(outcome.submit, Some(SubmitOutcome::Sent));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::dom::{Document, El, NodeId};
use crate::page::Page;
use crate::viewport::SimulatedViewport;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Standard page
// =========================================================================

/// The standard page as an in-memory document, with handles to its parts.
pub struct StandardPage {
    pub doc: Document,
    pub toggle: NodeId,
    pub about_link: NodeId,
    pub projects_link: NodeId,
    pub contact_link: NodeId,
    pub view_projects: NodeId,
    pub about: NodeId,
    pub projects: NodeId,
    pub contact: NodeId,
    /// Project cards, each marked `.reveal`.
    pub cards: Vec<NodeId>,
    pub form: NodeId,
    pub name: NodeId,
    pub email: NodeId,
    pub message: NodeId,
    pub name_error: NodeId,
    pub email_error: NodeId,
    pub message_error: NodeId,
    pub submit: NodeId,
    pub status: NodeId,
}

/// Build the standard page:
///
/// ```text
/// body
/// ├── header
/// │   ├── button.nav-toggle[aria-expanded=false]
/// │   └── ul.nav-links > li > a[href=#about|#projects|#contact]
/// └── main
///     ├── section.hero > button#view-projects
///     ├── section#about
///     ├── section#projects > article.project-card.reveal ×2
///     └── section#contact > form#contact-form
///         ├── input#contact-name + p[data-error-for=contact-name]
///         ├── input#contact-email + p[data-error-for=contact-email]
///         ├── textarea#contact-message + p[data-error-for=contact-message]
///         ├── button[type=submit]
///         └── div#contact-status
/// ```
pub fn standard_page() -> StandardPage {
    let mut doc = Document::new();
    let body = doc.body_id();

    let header = doc.append(body, El::new("header"));
    let toggle = doc.append(
        header,
        El::new("button")
            .class("nav-toggle")
            .attr("aria-expanded", "false")
            .attr("aria-controls", "site-nav"),
    );
    let list = doc.append(header, El::new("ul").class("nav-links").id("site-nav"));
    let link = |doc: &mut Document, href: &str, label: &str| {
        let item = doc.append(list, El::new("li"));
        doc.append(item, El::new("a").attr("href", href).text(label))
    };
    let about_link = link(&mut doc, "#about", "About");
    let projects_link = link(&mut doc, "#projects", "Projects");
    let contact_link = link(&mut doc, "#contact", "Contact");

    let main = doc.append(body, El::new("main"));
    let hero = doc.append(main, El::new("section").class("hero"));
    let view_projects = doc.append(hero, El::new("button").id("view-projects").text("View projects"));
    let about = doc.append(main, El::new("section").id("about"));
    let projects = doc.append(main, El::new("section").id("projects"));
    let cards = (0..2)
        .map(|_| doc.append(projects, El::new("article").class("project-card").class("reveal")))
        .collect();

    let contact = doc.append(main, El::new("section").id("contact"));
    let form = doc.append(contact, El::new("form").id("contact-form").attr("novalidate", ""));
    let field = |doc: &mut Document, tag: &str, id: &str, name: &str| {
        let input = doc.append(form, El::new(tag).id(id).attr("name", name));
        let slot = doc.append(form, El::new("p").class("field-error").attr("data-error-for", id));
        (input, slot)
    };
    let (name, name_error) = field(&mut doc, "input", "contact-name", "name");
    let (email, email_error) = field(&mut doc, "input", "contact-email", "email");
    let (message, message_error) = field(&mut doc, "textarea", "contact-message", "message");
    let submit = doc.append(form, El::new("button").attr("type", "submit").text("Send"));
    let status = doc.append(form, El::new("div").id("contact-status").attr("role", "status"));

    StandardPage {
        doc,
        toggle,
        about_link,
        projects_link,
        contact_link,
        view_projects,
        about,
        projects,
        contact,
        cards,
        form,
        name,
        email,
        message,
        name_error,
        email_error,
        message_error,
        submit,
        status,
    }
}

/// Fill every contact field with a value that passes validation.
pub fn fill_valid(page: &mut StandardPage) {
    page.doc.set_value(page.name, "Ada Lovelace");
    page.doc.set_value(page.email, "ada@example.com");
    page.doc.set_value(page.message, "Hello there.");
}

/// Wire `doc` with stock config and an intersection-capable viewport.
pub fn ready(doc: Document) -> Page<Document, SimulatedViewport<NodeId>> {
    Page::ready(doc, SimulatedViewport::new(), &SiteConfig::default()).unwrap()
}
