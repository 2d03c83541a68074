//! Headless replay of visitor interactions.
//!
//! `showcase simulate` builds the page that `render` would ship as an
//! in-memory [`Document`], wires it with a [`SimulatedViewport`], and replays
//! a JSON script of steps against it:
//!
//! ```json
//! [
//!   {"click": ".nav-toggle"},
//!   {"type": {"target": "#contact-email", "value": "ada@example"}},
//!   {"blur": "#contact-email"},
//!   {"submit": "#contact-form"},
//!   {"visibility": [{"target": "#projects", "ratio": 0.6}, {"target": ".project-card", "ratio": 1.0}]}
//! ]
//! ```
//!
//! Event steps target the first element matching their selector.
//! Visibility steps apply the ratio to every match and deliver the
//! resulting intersection batches. The final state is reported as a
//! [`Snapshot`].

use crate::config::{self, ConfigError, SiteConfig};
use crate::contact::{Banner, Field, SubmitOutcome};
use crate::content::{self, ContentError, PageContent};
use crate::dom::{Document, Dom, NodeId};
use crate::generate::page_document;
use crate::page::{EventKind, EventOutcome, Page};
use crate::selector::{Selector, SelectorError};
use crate::viewport::SimulatedViewport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SimulateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),
    #[error("No element matches {0}")]
    NoMatch(String),
}

/// The page as the headless host sees it.
pub type HeadlessPage = Page<Document, SimulatedViewport<NodeId>>;

/// One scripted visitor action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Click(String),
    /// Set the control's value, then fire `input` on it.
    Type { target: String, value: String },
    Blur(String),
    Submit(String),
    Visibility(Vec<VisibilityChange>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibilityChange {
    pub target: String,
    pub ratio: f64,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click(target) => write!(f, "click {target}"),
            Step::Type { target, value } => write!(f, "type {target} {value:?}"),
            Step::Blur(target) => write!(f, "blur {target}"),
            Step::Submit(target) => write!(f, "submit {target}"),
            Step::Visibility(changes) => {
                f.write_str("visibility")?;
                for change in changes {
                    write!(f, " {}={:.2}", change.target, change.ratio)?;
                }
                Ok(())
            }
        }
    }
}

/// What replaying one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: String,
    /// Listeners run, or notification batches delivered for visibility steps.
    pub handled: usize,
    pub default_prevented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<SubmitOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSnapshot {
    pub field: Field,
    pub value: String,
    /// Message of the last failed validation.
    pub error: Option<String>,
}

/// Observable page state after a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub steps: Vec<StepReport>,
    pub nav_open: bool,
    /// `href` of the link scroll-spy marks active.
    pub active_link: Option<String>,
    /// `None` when the page has no contact form.
    pub banner: Option<Banner>,
    pub status: String,
    pub fields: Vec<FieldSnapshot>,
    pub revealed: usize,
    pub pending_reveal: usize,
    /// Ids of the elements scrolled to, oldest first.
    pub scrolled_to: Vec<String>,
}

/// Parse a script.
pub fn parse_script(json: &str) -> Result<Vec<Step>, SimulateError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, SimulateError> {
    parse_script(&fs::read_to_string(path)?)
}

/// Wire the headless rendition of the page.
pub fn headless_page(content: &PageContent, config: &SiteConfig) -> Result<HeadlessPage, ConfigError> {
    Page::ready(page_document(content, config), SimulatedViewport::new(), config)
}

fn resolve_all(page: &HeadlessPage, selector: &str) -> Result<Vec<NodeId>, SimulateError> {
    let parsed: Selector = selector.parse()?;
    let nodes = page.dom().query_all(&parsed);
    if nodes.is_empty() {
        return Err(SimulateError::NoMatch(selector.to_string()));
    }
    Ok(nodes)
}

fn resolve(page: &HeadlessPage, selector: &str) -> Result<NodeId, SimulateError> {
    resolve_all(page, selector).map(|nodes| nodes[0])
}

/// Replay `steps` in order. Stops at the first step whose selector is
/// invalid or matches nothing.
pub fn replay(page: &mut HeadlessPage, steps: &[Step]) -> Result<Vec<StepReport>, SimulateError> {
    steps.iter().map(|step| run_step(page, step)).collect()
}

fn run_step(page: &mut HeadlessPage, step: &Step) -> Result<StepReport, SimulateError> {
    let outcome = match step {
        Step::Click(target) => {
            let node = resolve(page, target)?;
            page.dispatch(EventKind::Click, &node)
        }
        Step::Type { target, value } => {
            let node = resolve(page, target)?;
            page.dom_mut().set_value(node, value);
            page.dispatch(EventKind::Input, &node)
        }
        Step::Blur(target) => {
            let node = resolve(page, target)?;
            page.dispatch(EventKind::Blur, &node)
        }
        Step::Submit(target) => {
            let node = resolve(page, target)?;
            page.dispatch(EventKind::Submit, &node)
        }
        Step::Visibility(changes) => {
            let mut resolved = Vec::new();
            for change in changes {
                for node in resolve_all(page, &change.target)? {
                    resolved.push((node, change.ratio));
                }
            }
            let batches = page.viewport_mut().set_visibility(&resolved);
            let mut outcome = EventOutcome::default();
            for (observer, entries) in batches {
                page.notify(observer, &entries);
                outcome.handled += 1;
            }
            outcome
        }
    };
    debug!(%step, handled = outcome.handled, "replayed step");
    Ok(StepReport {
        step: step.to_string(),
        handled: outcome.handled,
        default_prevented: outcome.default_prevented,
        submit: outcome.submit,
    })
}

/// Capture the observable state of `page`.
pub fn snapshot(page: &HeadlessPage, config: &SiteConfig, steps: Vec<StepReport>) -> Snapshot {
    let dom = page.dom();
    let contact = page.contact();
    let fields = contact
        .map(|form| {
            form.fields()
                .iter()
                .map(|(field, input)| FieldSnapshot {
                    field,
                    value: dom.value(input),
                    error: form.error(field).map(|e| e.message(&config.messages).to_string()),
                })
                .collect()
        })
        .unwrap_or_default();

    Snapshot {
        steps,
        nav_open: page.nav().is_some_and(|nav| nav.is_open()),
        active_link: page
            .spy()
            .and_then(|spy| spy.active())
            .and_then(|link| dom.attribute(link, "href")),
        banner: contact.map(|form| form.banner()),
        status: contact.map(|form| dom.text(form.status())).unwrap_or_default(),
        fields,
        revealed: page.reveal().elements().len() - page.reveal().pending(),
        pending_reveal: page.reveal().pending(),
        scrolled_to: page
            .viewport()
            .scrolls()
            .iter()
            .map(|node| dom.id(node))
            .collect(),
    }
}

/// Load the page at `source`, replay the script at `script`, and snapshot.
pub fn simulate(source: &Path, script: &Path) -> Result<Snapshot, SimulateError> {
    let config = config::load_config(source)?;
    let content = content::load_content(source, &config)?;
    let steps = load_script(script)?;

    let mut page = headless_page(&content, &config)?;
    let reports = replay(&mut page, &steps)?;
    Ok(snapshot(&page, &config, reports))
}
