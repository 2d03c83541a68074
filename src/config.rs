//! Behavior configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! describe the standard page contract; a `config.toml` in the content root
//! overrides just the values it names.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml     # Behavior overrides (optional)
//! ├── page.toml       # Page copy: hero, sections, projects, contact
//! └── assets/         # Copied verbatim next to index.html
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [page]
//! script = "pkg/showcase.js"     # wasm bundle entry; omit for no script tag
//!
//! [selectors]
//! view_projects = "view-projects"  # element ids
//! projects = "projects"
//! contact_form = "contact-form"
//! contact_status = "contact-status"
//! nav_toggle = ".nav-toggle"       # CSS selectors
//! nav_links = ".nav-links a"
//! sections = "main section[id]"
//! reveal = ".reveal"
//!
//! [fields]
//! name = "contact-name"            # input ids
//! email = "contact-email"
//! message = "contact-message"
//! error_slot_attribute = "data-error-for"
//!
//! [classes]
//! error = "error"
//! success = "success"
//! active = "is-active"
//! nav_open = "nav-open"
//! revealed = "reveal-visible"
//!
//! [spy]
//! threshold = 0.4
//!
//! [reveal]
//! threshold = 0.2
//!
//! [messages]
//! required = "This field is required."
//! invalid_email = "Please enter a valid email address."
//! fix_fields = "Please fix the highlighted fields."
//! sent = "Thank you! Your message has been sent."
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! [spy]
//! threshold = 0.6
//! ```
//!
//! Unknown keys are rejected to catch typos early, and every selector is
//! parsed at load time.

use crate::selector::{Selector, SelectorError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Behavior configuration loaded from `config.toml`.
///
/// All fields have defaults matching the standard page markup. User config
/// files need only specify the values they want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Rendering options for the generated page.
    pub page: PageConfig,
    /// Where each component finds its elements.
    pub selectors: SelectorsConfig,
    /// Contact form inputs and their error slots.
    pub fields: FieldsConfig,
    /// Class names used as UI state markers.
    pub classes: ClassesConfig,
    /// Scroll-spy observation settings.
    pub spy: ObserverConfig,
    /// Reveal animation observation settings.
    pub reveal: ObserverConfig,
    /// User-facing validation and banner texts.
    pub messages: MessagesConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, threshold) in [
            ("spy.threshold", self.spy.threshold),
            ("reveal.threshold", self.reveal.threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be between 0.0 and 1.0"
                )));
            }
        }

        let s = &self.selectors;
        let f = &self.fields;
        for (key, id) in [
            ("selectors.view_projects", &s.view_projects),
            ("selectors.projects", &s.projects),
            ("selectors.contact_form", &s.contact_form),
            ("selectors.contact_status", &s.contact_status),
            ("fields.name", &f.name),
            ("fields.email", &f.email),
            ("fields.message", &f.message),
        ] {
            check_token(key, id)?;
        }
        check_token("fields.error_slot_attribute", &f.error_slot_attribute)?;
        if !f.error_slot_attribute.starts_with(|c: char| c.is_ascii_alphabetic())
            || !f
                .error_slot_attribute
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return Err(ConfigError::Validation(format!(
                "fields.error_slot_attribute must be an attribute name, got {:?}",
                f.error_slot_attribute
            )));
        }

        let c = &self.classes;
        for (key, class) in [
            ("classes.error", &c.error),
            ("classes.success", &c.success),
            ("classes.active", &c.active),
            ("classes.nav_open", &c.nav_open),
            ("classes.revealed", &c.revealed),
        ] {
            check_token(key, class)?;
        }
        if c.error == c.success {
            return Err(ConfigError::Validation(
                "classes.error and classes.success must differ".into(),
            ));
        }

        for (key, selector) in [
            ("selectors.nav_toggle", &s.nav_toggle),
            ("selectors.nav_links", &s.nav_links),
            ("selectors.sections", &s.sections),
            ("selectors.reveal", &s.reveal),
        ] {
            parse_selector(key, selector)?;
        }
        Ok(())
    }
}

/// Ids, class names and attribute names end up inside selectors and
/// `class` attributes, so they must be single non-empty tokens.
fn check_token(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '#' | '.' | '[' | ']'))
    {
        return Err(ConfigError::Validation(format!(
            "{key} must be a single name without whitespace or selector punctuation, got {value:?}"
        )));
    }
    Ok(())
}

fn parse_selector(key: &str, value: &str) -> Result<Selector, ConfigError> {
    value
        .parse()
        .map_err(|e: SelectorError| ConfigError::Validation(format!("{key}: {e}")))
}

/// Rendering options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Path of the wasm bundle's JS entry, relative to `index.html`.
    /// When absent the page is rendered without a module script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Element lookups. Ids are bare (`contact-form`), the rest are selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorsConfig {
    /// Id of the "view projects" trigger.
    pub view_projects: String,
    /// Id of the projects section the trigger scrolls to.
    pub projects: String,
    /// Id of the contact form.
    pub contact_form: String,
    /// Id of the form's status banner.
    pub contact_status: String,
    /// Selector of the mobile nav toggle (first match is used).
    pub nav_toggle: String,
    /// Selector of the navigation links.
    pub nav_links: String,
    /// Selector of the sections watched by the scroll-spy.
    pub sections: String,
    /// Selector of revealable elements.
    pub reveal: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            view_projects: "view-projects".to_string(),
            projects: "projects".to_string(),
            contact_form: "contact-form".to_string(),
            contact_status: "contact-status".to_string(),
            nav_toggle: ".nav-toggle".to_string(),
            nav_links: ".nav-links a".to_string(),
            sections: "main section[id]".to_string(),
            reveal: ".reveal".to_string(),
        }
    }
}

impl SelectorsConfig {
    /// Parse the selector-valued settings. Infallible after
    /// [`SiteConfig::validate`] has passed.
    pub fn parsed(&self) -> Result<ParsedSelectors, ConfigError> {
        Ok(ParsedSelectors {
            nav_toggle: parse_selector("selectors.nav_toggle", &self.nav_toggle)?,
            nav_links: parse_selector("selectors.nav_links", &self.nav_links)?,
            sections: parse_selector("selectors.sections", &self.sections)?,
            reveal: parse_selector("selectors.reveal", &self.reveal)?,
        })
    }
}

/// Selector settings in parsed form.
#[derive(Debug, Clone)]
pub struct ParsedSelectors {
    pub nav_toggle: Selector,
    pub nav_links: Selector,
    pub sections: Selector,
    pub reveal: Selector,
}

/// Contact form inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldsConfig {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Attribute whose value names the input an error slot belongs to.
    pub error_slot_attribute: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            name: "contact-name".to_string(),
            email: "contact-email".to_string(),
            message: "contact-message".to_string(),
            error_slot_attribute: "data-error-for".to_string(),
        }
    }
}

/// Class names that carry UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassesConfig {
    /// On an invalid input, and on the banner after a failed submit.
    pub error: String,
    /// On the banner after a successful submit.
    pub success: String,
    /// On the nav link of the section in view.
    pub active: String,
    /// On `<body>` while the mobile menu is open.
    pub nav_open: String,
    /// On a revealable element once it has scrolled into view.
    pub revealed: String,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        Self {
            error: "error".to_string(),
            success: "success".to_string(),
            active: "is-active".to_string(),
            nav_open: "nav-open".to_string(),
            revealed: "reveal-visible".to_string(),
        }
    }
}

/// Intersection observer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverConfig {
    /// Visible fraction of a target that counts as "in view".
    pub threshold: f64,
}

impl ObserverConfig {
    pub fn spy() -> Self {
        Self { threshold: 0.4 }
    }

    pub fn reveal() -> Self {
        Self { threshold: 0.2 }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::spy()
    }
}

/// Texts shown to the visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessagesConfig {
    pub required: String,
    pub invalid_email: String,
    pub fix_fields: String,
    pub sent: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            required: "This field is required.".to_string(),
            invalid_email: "Please enter a valid email address.".to_string(),
            fix_fields: "Please fix the highlighted fields.".to_string(),
            sent: "Thank you! Your message has been sent.".to_string(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            selectors: SelectorsConfig::default(),
            fields: FieldsConfig::default(),
            classes: ClassesConfig::default(),
            spy: ObserverConfig::spy(),
            reveal: ObserverConfig::reveal(),
            messages: MessagesConfig::default(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Showcase Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[page]
# JS entry of the wasm bundle, relative to index.html. When set, the page
# loads it as a module and the interactive behavior runs in the browser.
# script = "pkg/showcase.js"

# ---------------------------------------------------------------------------
# Element lookups
# ---------------------------------------------------------------------------
[selectors]
# Element ids (without '#').
view_projects = "view-projects"
projects = "projects"
contact_form = "contact-form"
contact_status = "contact-status"

# CSS selectors. Supported: tag, #id, .class, [attr], [attr="value"] and
# the descendant combinator (whitespace).
nav_toggle = ".nav-toggle"
nav_links = ".nav-links a"
sections = "main section[id]"
reveal = ".reveal"

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[fields]
# Input ids of the three required fields.
name = "contact-name"
email = "contact-email"
message = "contact-message"

# Error slots are the elements inside the form whose attribute of this
# name holds the id of the input they describe.
error_slot_attribute = "data-error-for"

# ---------------------------------------------------------------------------
# State classes
# ---------------------------------------------------------------------------
[classes]
error = "error"            # invalid input; banner after a failed submit
success = "success"        # banner after a successful submit
active = "is-active"       # nav link of the section in view
nav_open = "nav-open"      # on <body> while the mobile menu is open
revealed = "reveal-visible" # revealable element that has scrolled into view

# ---------------------------------------------------------------------------
# Visibility thresholds (fraction of the element that must be visible)
# ---------------------------------------------------------------------------
[spy]
threshold = 0.4

[reveal]
threshold = 0.2

# ---------------------------------------------------------------------------
# Messages
# ---------------------------------------------------------------------------
[messages]
required = "This field is required."
invalid_email = "Please enter a valid email address."
fix_fields = "Please fix the highlighted fields."
sent = "Thank you! Your message has been sent."
"##
}
