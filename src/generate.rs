//! Static page generation.
//!
//! Renders `index.html` from `page.toml` and `config.toml`, and builds the
//! same page as an in-memory [`Document`] so the behavior can be exercised
//! headlessly (`showcase simulate`) against exactly the markup that ships.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html        # The page
//! └── ...               # Everything under content/assets/, copied verbatim
//! ```
//!
//! ## Page Layout
//!
//! ```text
//! body
//! ├── header.site-header
//! │   ├── p.brand
//! │   ├── button.nav-toggle[aria-expanded]
//! │   └── nav#site-nav > ul.nav-links > li > a[href=#<section>]
//! ├── main
//! │   ├── section.hero > button#view-projects
//! │   ├── section#<id>[.reveal]           one per [[sections]]
//! │   ├── section#projects > article.project-card.reveal
//! │   └── section#contact > form#contact-form
//! ├── footer.site-footer
//! ├── script#showcase-config              behavior config as JSON
//! └── script[type=module]                 wasm loader, when [page] script is set
//! ```
//!
//! ## CSS
//!
//! `static/style.css` carries the layout. The rules that make the state
//! classes visible are generated from `[classes]` so renamed classes keep
//! working. Reveal elements are only hidden once the wasm host has marked
//! the root with `data-behavior`, so the page reads fine without script.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Section bodies are markdown rendered with pulldown-cmark.

use crate::config::{self, ClassesConfig, ConfigError, SiteConfig};
use crate::content::{self, CONTACT_SECTION_ID, ContentError, PageContent, SectionContent};
use crate::contact::Field;
use crate::dom::{Document, Dom, El};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Id of the `<script type="application/json">` holding the behavior config.
pub const CONFIG_SCRIPT_ID: &str = "showcase-config";
/// Id of the `<nav>` the toggle controls.
pub const NAV_ID: &str = "site-nav";
/// Attribute the browser host sets on `<html>` once behavior is wired.
pub const BEHAVIOR_ATTRIBUTE: &str = "data-behavior";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What [`generate`] produced.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub index: PathBuf,
    /// Copied asset files, relative to the output directory.
    pub assets: Vec<PathBuf>,
    pub sections: usize,
    pub projects: usize,
    /// Page contract lookups that found nothing.
    pub warnings: Vec<String>,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Render the page for `source` into `output_dir`.
pub fn generate(source: &Path, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let config = config::load_config(source)?;
    let content = content::load_content(source, &config)?;

    let warnings = contract_warnings(&page_document(&content, &config), &config)?;
    for warning in &warnings {
        warn!("{warning}");
    }

    fs::create_dir_all(output_dir)?;
    let index = output_dir.join("index.html");
    fs::write(&index, render_page(&content, &config)?.into_string())?;
    info!(path = %index.display(), "wrote page");

    let assets = copy_assets(&source.join("assets"), output_dir)?;

    Ok(GenerateReport {
        index,
        assets,
        sections: content.sections.len(),
        projects: content.projects.len(),
        warnings,
    })
}

/// Copy the asset tree into `dst`, returning the copied files relative to it.
fn copy_assets(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let mut copied = Vec::new();
    if !src.is_dir() {
        return Ok(copied);
    }
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            debug!(asset = %relative.display(), "copied asset");
            copied.push(relative.to_path_buf());
        }
    }
    Ok(copied)
}

/// Lookups of the page contract that find nothing in `dom`.
///
/// Behavior degrades silently at runtime, so this is where a selector that
/// no longer fits the markup gets noticed.
pub fn contract_warnings<D: Dom>(dom: &D, config: &SiteConfig) -> Result<Vec<String>, ConfigError> {
    let mut warnings = Vec::new();
    let s = &config.selectors;
    let mut ids = vec![
        ("selectors.view_projects", s.view_projects.as_str()),
        ("selectors.projects", s.projects.as_str()),
        ("selectors.contact_form", s.contact_form.as_str()),
        ("selectors.contact_status", s.contact_status.as_str()),
    ];
    ids.extend(Field::ALL.map(|f| (field_key(f), f.input_id(&config.fields))));
    for (key, id) in ids {
        if dom.element_by_id(id).is_none() {
            warnings.push(format!("{key}: no element with id {id:?}"));
        }
    }

    let parsed = s.parsed()?;
    for (key, selector) in [
        ("selectors.nav_toggle", &parsed.nav_toggle),
        ("selectors.nav_links", &parsed.nav_links),
        ("selectors.sections", &parsed.sections),
        ("selectors.reveal", &parsed.reveal),
    ] {
        if dom.query_all(selector).is_empty() {
            warnings.push(format!("{key}: no element matches {selector}"));
        }
    }
    Ok(warnings)
}

fn field_key(field: Field) -> &'static str {
    match field {
        Field::Name => "fields.name",
        Field::Email => "fields.email",
        Field::Message => "fields.message",
    }
}

// ============================================================================
// Shared page model
// ============================================================================

/// Nav entries as `(href, label)`, in page order.
fn nav_entries(content: &PageContent, config: &SiteConfig) -> Vec<(String, String)> {
    let mut entries: Vec<_> = content
        .sections
        .iter()
        .map(|s| (format!("#{}", s.id), s.title.clone()))
        .collect();
    entries.push((format!("#{}", config.selectors.projects), "Projects".to_string()));
    entries.push((format!("#{CONTACT_SECTION_ID}"), content.contact.heading.clone()));
    entries
}

fn hero_heading(content: &PageContent) -> &str {
    if content.hero.heading.is_empty() {
        &content.title
    } else {
        &content.hero.heading
    }
}

/// Contact inputs as `(field, label, tag, input type)`.
const CONTACT_INPUTS: [(Field, &str, &str, &str); 3] = [
    (Field::Name, "Name", "input", "text"),
    (Field::Email, "Email", "input", "email"),
    (Field::Message, "Message", "textarea", ""),
];

fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(markdown));
    out
}

/// JSON safe to place inside a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, GenerateError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// A relative path becomes a `./` module specifier; absolute paths and URLs
/// are kept.
fn module_specifier(path: &str) -> String {
    if path.starts_with("./") || path.starts_with("../") || path.starts_with('/') || path.contains("://") {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

/// Rules that make the state classes visible.
///
/// Only the state classes follow `[classes]`. The structural classes
/// (`.reveal`, `.nav-links`, `.nav-toggle`, `.field`) are the ones this
/// renderer always emits, so a `[selectors]` override that points elsewhere
/// changes what the behavior binds to, not how the page is styled.
pub fn behavior_css(classes: &ClassesConfig) -> String {
    let ClassesConfig {
        error,
        success,
        active,
        nav_open,
        revealed,
    } = classes;
    format!(
        r#"html[{BEHAVIOR_ATTRIBUTE}] .reveal {{ opacity: 0; transform: translateY(1.5rem); transition: opacity 0.6s ease, transform 0.6s ease; }}
html[{BEHAVIOR_ATTRIBUTE}] .reveal.{revealed} {{ opacity: 1; transform: none; }}
.nav-links a.{active} {{ border-bottom-color: currentColor; }}
.field input.{error}, .field textarea.{error} {{ border-color: #b3261e; }}
[role="status"].{error} {{ color: #b3261e; }}
[role="status"].{success} {{ color: #1e7b34; }}
@media (max-width: 720px) {{
    .nav-toggle {{ display: inline-block; }}
    .nav-links {{ display: none; }}
    body.{nav_open} .nav-links {{ display: flex; flex-direction: column; position: absolute; top: 100%; left: 0; right: 0; padding: 1rem 1.5rem; background: #fafafa; }}
}}"#
    )
}

// ============================================================================
// HTML
// ============================================================================

/// Render the complete page.
pub fn render_page(content: &PageContent, config: &SiteConfig) -> Result<Markup, GenerateError> {
    let css = format!("{}\n\n{}", CSS_STATIC, behavior_css(&config.classes));
    let config_json = script_json(config)?;
    let loader = match &config.page.script {
        Some(path) => Some(format!(
            "import init from {};\ninit();",
            script_json(&module_specifier(path))?
        )),
        None => None,
    };

    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (content.title) }
                @if !content.tagline.is_empty() {
                    meta name="description" content=(content.tagline);
                }
                style { (PreEscaped(css)) }
            }
            body {
                (site_header(content, config))
                main {
                    section.hero {
                        h1 { (hero_heading(content)) }
                        @if !content.hero.text.is_empty() {
                            p.hero-text { (content.hero.text) }
                        }
                        button id=(config.selectors.view_projects) type="button" { (content.hero.cta) }
                    }
                    @for section in &content.sections {
                        (content_section(section))
                    }
                    (projects_section(content, config))
                    (contact_section(content, config))
                }
                footer.site-footer {
                    p { (content.title) }
                }
                script type="application/json" id=(CONFIG_SCRIPT_ID) { (PreEscaped(config_json)) }
                @if let Some(loader) = loader {
                    script type="module" { (PreEscaped(loader)) }
                }
            }
        }
    })
}

fn site_header(content: &PageContent, config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            p.brand { (content.title) }
            button.nav-toggle type="button" aria-expanded="false" aria-controls=(NAV_ID) aria-label="Toggle navigation" {
                span.nav-toggle-bar {}
                span.nav-toggle-bar {}
                span.nav-toggle-bar {}
            }
            nav id=(NAV_ID) aria-label="Primary" {
                ul.nav-links {
                    @for (href, label) in nav_entries(content, config) {
                        li { a href=(href) { (label) } }
                    }
                }
            }
        }
    }
}

fn content_section(section: &SectionContent) -> Markup {
    html! {
        section id=(section.id) class=[section.reveal.then_some("reveal")] {
            h2 { (section.title) }
            div.section-body {
                (PreEscaped(markdown_to_html(&section.body)))
            }
        }
    }
}

fn projects_section(content: &PageContent, config: &SiteConfig) -> Markup {
    html! {
        section id=(config.selectors.projects) {
            h2 { "Projects" }
            div.project-grid {
                @for project in &content.projects {
                    article.project-card.reveal {
                        h3 {
                            @if let Some(url) = &project.url {
                                a href=(url) { (project.title) }
                            } @else {
                                (project.title)
                            }
                        }
                        @if !project.description.is_empty() {
                            p { (project.description) }
                        }
                        @if !project.tags.is_empty() {
                            ul.tags {
                                @for tag in &project.tags {
                                    li { (tag) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn contact_section(content: &PageContent, config: &SiteConfig) -> Markup {
    html! {
        section id=(CONTACT_SECTION_ID) {
            h2 { (content.contact.heading) }
            @if !content.contact.intro.is_empty() {
                p { (content.contact.intro) }
            }
            form id=(config.selectors.contact_form) novalidate {
                @for (field, label, tag, input_type) in CONTACT_INPUTS {
                    @let id = field.input_id(&config.fields);
                    div.field {
                        label for=(id) { (label) }
                        @if tag == "textarea" {
                            textarea id=(id) name=(field.as_str()) rows="6" {}
                        } @else {
                            input id=(id) name=(field.as_str()) type=(input_type) autocomplete=(field.as_str());
                        }
                        (error_slot(&config.fields.error_slot_attribute, id))
                    }
                }
                button type="submit" { (content.contact.submit_label) }
                div id=(config.selectors.contact_status) role="status" aria-live="polite" {}
            }
        }
    }
}

/// The slot's attribute name is configurable, which a maud literal cannot
/// express. The name is validated as a plain attribute name at load time.
fn error_slot(attribute: &str, input_id: &str) -> Markup {
    let escaped_id = html! { (input_id) }.into_string();
    PreEscaped(format!(r#"<p class="field-error" {attribute}="{escaped_id}"></p>"#))
}

// ============================================================================
// Headless document
// ============================================================================

/// Build the rendered page as an in-memory [`Document`].
///
/// Mirrors [`render_page`] element for element wherever an id, class or
/// behavior-relevant attribute is involved. Text-only elements are kept
/// where they carry copy the page's behavior reads.
pub fn page_document(content: &PageContent, config: &SiteConfig) -> Document {
    let mut doc = Document::new();
    let body = doc.body_id();

    let header = doc.append(body, El::new("header").class("site-header"));
    doc.append(header, El::new("p").class("brand").text(&content.title));
    let toggle = doc.append(
        header,
        El::new("button")
            .class("nav-toggle")
            .attr("type", "button")
            .attr("aria-expanded", "false")
            .attr("aria-controls", NAV_ID)
            .attr("aria-label", "Toggle navigation"),
    );
    for _ in 0..3 {
        doc.append(toggle, El::new("span").class("nav-toggle-bar"));
    }
    let nav = doc.append(header, El::new("nav").id(NAV_ID).attr("aria-label", "Primary"));
    let list = doc.append(nav, El::new("ul").class("nav-links"));
    for (href, label) in nav_entries(content, config) {
        let item = doc.append(list, El::new("li"));
        doc.append(item, El::new("a").attr("href", &href).text(&label));
    }

    let main = doc.append(body, El::new("main"));
    let hero = doc.append(main, El::new("section").class("hero"));
    doc.append(hero, El::new("h1").text(hero_heading(content)));
    if !content.hero.text.is_empty() {
        doc.append(hero, El::new("p").class("hero-text").text(&content.hero.text));
    }
    doc.append(
        hero,
        El::new("button")
            .id(&config.selectors.view_projects)
            .attr("type", "button")
            .text(&content.hero.cta),
    );

    for section in &content.sections {
        let mut el = El::new("section").id(&section.id);
        if section.reveal {
            el = el.class("reveal");
        }
        let node = doc.append(main, el);
        doc.append(node, El::new("h2").text(&section.title));
        doc.append(node, El::new("div").class("section-body").text(&section.body));
    }

    let projects = doc.append(main, El::new("section").id(&config.selectors.projects));
    doc.append(projects, El::new("h2").text("Projects"));
    let grid = doc.append(projects, El::new("div").class("project-grid"));
    for project in &content.projects {
        let card = doc.append(grid, El::new("article").class("project-card").class("reveal"));
        let heading = doc.append(card, El::new("h3").text(&project.title));
        if let Some(url) = &project.url {
            doc.append(heading, El::new("a").attr("href", url).text(&project.title));
        }
        if !project.description.is_empty() {
            doc.append(card, El::new("p").text(&project.description));
        }
        if !project.tags.is_empty() {
            let tags = doc.append(card, El::new("ul").class("tags"));
            for tag in &project.tags {
                doc.append(tags, El::new("li").text(tag));
            }
        }
    }

    let contact = doc.append(main, El::new("section").id(CONTACT_SECTION_ID));
    doc.append(contact, El::new("h2").text(&content.contact.heading));
    let form = doc.append(
        contact,
        El::new("form").id(&config.selectors.contact_form).attr("novalidate", ""),
    );
    for (field, label, tag, input_type) in CONTACT_INPUTS {
        let id = field.input_id(&config.fields);
        let row = doc.append(form, El::new("div").class("field"));
        doc.append(row, El::new("label").attr("for", id).text(label));
        let mut input = El::new(tag).id(id).attr("name", field.as_str());
        if !input_type.is_empty() {
            input = input.attr("type", input_type);
        }
        doc.append(row, input);
        doc.append(
            row,
            El::new("p")
                .class("field-error")
                .attr(&config.fields.error_slot_attribute, id),
        );
    }
    doc.append(form, El::new("button").attr("type", "submit").text(&content.contact.submit_label));
    doc.append(
        form,
        El::new("div")
            .id(&config.selectors.contact_status)
            .attr("role", "status")
            .attr("aria-live", "polite"),
    );

    let footer = doc.append(body, El::new("footer").class("site-footer"));
    doc.append(footer, El::new("p").text(&content.title));
    doc.append(
        body,
        El::new("script").id(CONFIG_SCRIPT_ID).attr("type", "application/json"),
    );
    doc
}

// ============================================================================
// Tests
// ============================================================================
