//! Page copy loaded from `page.toml`.
//!
//! The page is a hero with a call to action, any number of markdown content
//! sections, a project grid, and the contact form:
//!
//! ```toml
//! title = "Ada Lovelace"
//! tagline = "Analyst, metaphysician, and founder of scientific computing"
//!
//! [hero]
//! heading = "Hello, I'm Ada."
//! text = "I write programs for engines that do not exist yet."
//! cta = "View projects"
//!
//! [[sections]]
//! id = "about"
//! title = "About"
//! body = "Markdown **works** here."
//! reveal = true
//!
//! [[projects]]
//! title = "Notes on the Analytical Engine"
//! description = "Algorithm for Bernoulli numbers."
//! url = "https://example.com/notes"
//! tags = ["math", "engines"]
//!
//! [contact]
//! heading = "Get in touch"
//! intro = "Questions, commissions, corrections."
//! submit_label = "Send message"
//! ```
//!
//! Sections become `main section[id]` elements with a nav link each, so
//! their ids must be unique and must not collide with the ids the page
//! reserves for its own elements.

use crate::config::SiteConfig;
use crate::contact::Field;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Id of the section wrapping the contact form.
pub const CONTACT_SECTION_ID: &str = "contact";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Content validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageContent {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub hero: HeroContent,
    #[serde(default)]
    pub sections: Vec<SectionContent>,
    #[serde(default)]
    pub projects: Vec<ProjectContent>,
    #[serde(default)]
    pub contact: ContactContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroContent {
    pub heading: String,
    pub text: String,
    /// Label of the button that scrolls to the projects.
    pub cta: String,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            heading: String::new(),
            text: String::new(),
            cta: "View projects".to_string(),
        }
    }
}

/// A markdown content section with its own nav link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionContent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Fade the section in when it scrolls into view.
    #[serde(default)]
    pub reveal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectContent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactContent {
    pub heading: String,
    pub intro: String,
    pub submit_label: String,
}

impl Default for ContactContent {
    fn default() -> Self {
        Self {
            heading: "Contact".to_string(),
            intro: String::new(),
            submit_label: "Send".to_string(),
        }
    }
}

impl PageContent {
    /// Check the content against the element ids the page reserves.
    pub fn validate(&self, config: &SiteConfig) -> Result<(), ContentError> {
        if self.title.trim().is_empty() {
            return Err(ContentError::Validation("title must not be empty".into()));
        }

        let reserved = reserved_ids(config);
        let mut seen = HashSet::new();
        for (index, section) in self.sections.iter().enumerate() {
            let id = section.id.as_str();
            if id.is_empty() || id.chars().any(|c| c.is_whitespace() || c == '#') {
                return Err(ContentError::Validation(format!(
                    "sections[{index}].id must be a non-empty id without whitespace or '#', got {id:?}"
                )));
            }
            if reserved.contains(id) {
                return Err(ContentError::Validation(format!(
                    "sections[{index}].id {id:?} is reserved by the page"
                )));
            }
            if !seen.insert(id) {
                return Err(ContentError::Validation(format!(
                    "sections[{index}].id {id:?} is used by another section"
                )));
            }
        }

        for (index, project) in self.projects.iter().enumerate() {
            if project.title.trim().is_empty() {
                return Err(ContentError::Validation(format!(
                    "projects[{index}].title must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Ids the rendered page gives its own elements.
pub fn reserved_ids(config: &SiteConfig) -> HashSet<&str> {
    let selectors = &config.selectors;
    let mut ids: HashSet<&str> = [
        selectors.view_projects.as_str(),
        selectors.projects.as_str(),
        selectors.contact_form.as_str(),
        selectors.contact_status.as_str(),
        CONTACT_SECTION_ID,
        crate::generate::CONFIG_SCRIPT_ID,
        crate::generate::NAV_ID,
    ]
    .into_iter()
    .collect();
    ids.extend(Field::ALL.map(|f| f.input_id(&config.fields)));
    ids
}

/// Load `page.toml` from the content root and validate it.
pub fn load_content(root: &Path, config: &SiteConfig) -> Result<PageContent, ContentError> {
    let path = root.join("page.toml");
    if !path.exists() {
        return Err(ContentError::Validation(format!(
            "{} not found",
            path.display()
        )));
    }
    let text = fs::read_to_string(&path)?;
    let content: PageContent = toml::from_str(&text)?;
    content.validate(config)?;
    Ok(content)
}
