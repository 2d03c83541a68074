//! Contact form validation with simulated submission.
//!
//! Three required fields (`name`, `email`, `message`); the email must also
//! have a `local@domain.tld` shape. Validation runs per field on blur and for
//! all fields on submit, writing messages into each field's error slot and
//! toggling the `error` class on the input. A status banner reports the
//! outcome of a submit and is cleared as soon as the visitor edits a field.
//!
//! Submission never leaves the page: a valid submit shows the success
//! message and resets the form. That branch is where a delivery backend
//! would be called.

use crate::config::{ClassesConfig, FieldsConfig, MessagesConfig, SiteConfig};
use crate::dom::Dom;
use crate::selector::Selector;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile"));

/// A contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    /// Every field, in validation order.
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }

    /// The input id configured for this field.
    pub fn input_id(self, fields: &FieldsConfig) -> &str {
        match self {
            Field::Name => &fields.name,
            Field::Email => &fields.email,
            Field::Message => &fields.message,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    Required,
    InvalidEmail,
}

impl FieldError {
    pub fn message(self, messages: &MessagesConfig) -> &str {
        match self {
            FieldError::Required => &messages.required,
            FieldError::InvalidEmail => &messages.invalid_email,
        }
    }
}

/// Permissive single-level-domain email shape check.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validate one field value. Surrounding whitespace is ignored.
pub fn validate(field: Field, value: &str) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Some(FieldError::Required)
    } else if field == Field::Email && !is_valid_email(value) {
        Some(FieldError::InvalidEmail)
    } else {
        None
    }
}

/// State of the status banner; mirrored by its `success` / `error` class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    #[default]
    Idle,
    Error,
    Success,
}

/// Result of a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// Submission was simulated; the form has been reset.
    Sent,
    /// These fields failed validation, in field order.
    Rejected(Vec<(Field, FieldError)>),
}

/// Input element of each field. Missing inputs are simply absent.
#[derive(Debug, Clone)]
pub struct FieldRegistry<N> {
    inputs: [Option<N>; 3],
}

impl<N: Clone + PartialEq> FieldRegistry<N> {
    pub fn get(&self, field: Field) -> Option<&N> {
        self.inputs[field.index()].as_ref()
    }

    /// The field whose input is `node`.
    pub fn field_of(&self, node: &N) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| self.inputs[f.index()].as_ref() == Some(node))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &N)> {
        Field::ALL
            .into_iter()
            .filter_map(|f| self.inputs[f.index()].as_ref().map(|n| (f, n)))
    }
}

/// The contact form component.
#[derive(Debug, Clone)]
pub struct ContactForm<N> {
    form: N,
    status: N,
    fields: FieldRegistry<N>,
    error_attribute: String,
    classes: ClassesConfig,
    messages: MessagesConfig,
    banner: Banner,
    errors: [Option<FieldError>; 3],
}

impl<N: Clone + PartialEq + fmt::Debug> ContactForm<N> {
    /// Find the form, its banner and its inputs. `None` unless both the form
    /// and the banner exist.
    pub fn attach<D: Dom<Node = N>>(dom: &D, config: &SiteConfig) -> Option<Self> {
        let form = dom.element_by_id(&config.selectors.contact_form)?;
        let status = dom.element_by_id(&config.selectors.contact_status)?;
        let inputs = Field::ALL.map(|f| dom.element_by_id(f.input_id(&config.fields)));
        Some(Self {
            form,
            status,
            fields: FieldRegistry { inputs },
            error_attribute: config.fields.error_slot_attribute.clone(),
            classes: config.classes.clone(),
            messages: config.messages.clone(),
            banner: Banner::Idle,
            errors: [None; 3],
        })
    }

    pub fn form(&self) -> &N {
        &self.form
    }

    pub fn status(&self) -> &N {
        &self.status
    }

    pub fn fields(&self) -> &FieldRegistry<N> {
        &self.fields
    }

    pub fn banner(&self) -> Banner {
        self.banner
    }

    /// Outcome of the last validation of `field`.
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors[field.index()]
    }

    fn error_slot<D: Dom<Node = N>>(&self, dom: &D, input: &N) -> Option<N> {
        let selector = Selector::attribute_equals(&self.error_attribute, &dom.id(input));
        dom.query_within(&self.form, &selector).into_iter().next()
    }

    /// Validate one field and reflect the result on its input and slot.
    /// A field without an input validates as correct.
    pub fn validate_field<D: Dom<Node = N>>(&mut self, dom: &mut D, field: Field) -> Option<FieldError> {
        let input = self.fields.get(field)?.clone();
        let error = validate(field, &dom.value(&input));
        self.errors[field.index()] = error;

        let message = error.map_or("", |e| e.message(&self.messages));
        if let Some(slot) = self.error_slot(dom, &input) {
            dom.set_text(&slot, message);
        }
        if error.is_some() {
            dom.add_class(&input, &self.classes.error);
        } else {
            dom.remove_class(&input, &self.classes.error);
        }
        debug!(%field, ?error, "validated contact field");
        error
    }

    /// Blur handler.
    pub fn on_blur<D: Dom<Node = N>>(&mut self, dom: &mut D, field: Field) {
        self.validate_field(dom, field);
    }

    /// Input handler: editing clears the banner but does not re-validate.
    pub fn on_input<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        dom.set_text(&self.status, "");
        dom.remove_class(&self.status, &self.classes.success);
        dom.remove_class(&self.status, &self.classes.error);
        self.banner = Banner::Idle;
    }

    /// Submit handler. The caller suppresses the browser's own submission.
    pub fn on_submit<D: Dom<Node = N>>(&mut self, dom: &mut D) -> SubmitOutcome {
        let rejected: Vec<_> = Field::ALL
            .into_iter()
            .filter_map(|f| self.validate_field(dom, f).map(|e| (f, e)))
            .collect();

        if !rejected.is_empty() {
            self.set_banner(dom, Banner::Error);
            debug!(rejected = rejected.len(), "contact form rejected");
            return SubmitOutcome::Rejected(rejected);
        }

        // Integration point for real delivery.
        self.set_banner(dom, Banner::Success);
        dom.reset_form(&self.form);
        for (_, input) in self.fields.iter() {
            dom.remove_class(input, &self.classes.error);
        }
        let any_slot = Selector::attribute_present(&self.error_attribute);
        for slot in dom.query_within(&self.form, &any_slot) {
            dom.set_text(&slot, "");
        }
        self.errors = [None; 3];
        debug!("contact form sent (simulated)");
        SubmitOutcome::Sent
    }

    fn set_banner<D: Dom<Node = N>>(&mut self, dom: &mut D, banner: Banner) {
        let (text, remove, add) = match banner {
            Banner::Error => (&self.messages.fix_fields, &self.classes.success, &self.classes.error),
            Banner::Success => (&self.messages.sent, &self.classes.error, &self.classes.success),
            Banner::Idle => return self.on_input(dom),
        };
        dom.set_text(&self.status, text);
        dom.remove_class(&self.status, remove);
        dom.add_class(&self.status, add);
        self.banner = banner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::test_helpers::*;

    #[test]
    fn empty_and_blank_values_are_required() {
        for field in Field::ALL {
            assert_eq!(validate(field, ""), Some(FieldError::Required));
            assert_eq!(validate(field, "   \t\n"), Some(FieldError::Required));
        }
    }

    #[test]
    fn email_shape() {
        for bad in ["ada", "ada@", "@example.com", "ada@example", "ada@@example.com", "a da@example.com", "ada@example."] {
            assert_eq!(
                validate(Field::Email, bad),
                Some(FieldError::InvalidEmail),
                "{bad} should be rejected"
            );
        }
        for good in ["ada@example.com", "a.b+c@mail.example.org", "  ada@example.com  ", "x@y.z"] {
            assert_eq!(validate(Field::Email, good), None, "{good} should pass");
        }
    }

    #[test]
    fn only_email_is_shape_checked() {
        assert_eq!(validate(Field::Name, "not an email"), None);
        assert_eq!(validate(Field::Message, "hello"), None);
    }

    #[test]
    fn messages_come_from_config() {
        let mut messages = MessagesConfig::default();
        assert_eq!(FieldError::Required.message(&messages), "This field is required.");
        messages.required = "Requis.".to_string();
        assert_eq!(FieldError::Required.message(&messages), "Requis.");
    }

    fn attached(doc: &Document) -> ContactForm<crate::dom::NodeId> {
        ContactForm::attach(doc, &SiteConfig::default()).unwrap()
    }

    #[test]
    fn attach_requires_form_and_status() {
        let page = standard_page();
        assert!(ContactForm::attach(&page.doc, &SiteConfig::default()).is_some());

        let mut config = SiteConfig::default();
        config.selectors.contact_status = "missing".to_string();
        assert!(ContactForm::attach(&page.doc, &config).is_none());
    }

    #[test]
    fn registry_maps_inputs_to_fields() {
        let page = standard_page();
        let form = attached(&page.doc);
        assert_eq!(form.fields().field_of(&page.email), Some(Field::Email));
        assert_eq!(form.fields().field_of(&page.form), None);
        assert_eq!(form.fields().iter().count(), 3);
    }

    #[test]
    fn blur_writes_error_slot_and_class() {
        let mut page = standard_page();
        let mut form = attached(&page.doc);
        page.doc.set_value(page.email, "nope");

        form.on_blur(&mut page.doc, Field::Email);
        assert_eq!(page.doc.text(&page.email_error), "Please enter a valid email address.");
        assert!(page.doc.has_class(&page.email, "error"));
        assert_eq!(form.error(Field::Email), Some(FieldError::InvalidEmail));

        page.doc.set_value(page.email, "ada@example.com");
        form.on_blur(&mut page.doc, Field::Email);
        assert_eq!(page.doc.text(&page.email_error), "");
        assert!(!page.doc.has_class(&page.email, "error"));
    }

    #[test]
    fn blur_touches_only_its_own_field() {
        let mut page = standard_page();
        let mut form = attached(&page.doc);
        form.on_blur(&mut page.doc, Field::Name);
        assert_eq!(page.doc.text(&page.name_error), "This field is required.");
        assert_eq!(page.doc.text(&page.message_error), "");
    }

    #[test]
    fn submit_with_errors_sets_error_banner() {
        let mut page = standard_page();
        let mut form = attached(&page.doc);
        page.doc.set_value(page.name, "Ada");

        let outcome = form.on_submit(&mut page.doc);
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(vec![
                (Field::Email, FieldError::Required),
                (Field::Message, FieldError::Required),
            ])
        );
        assert_eq!(page.doc.text(&page.status), "Please fix the highlighted fields.");
        assert!(page.doc.has_class(&page.status, "error"));
        assert!(!page.doc.has_class(&page.status, "success"));
        assert_eq!(form.banner(), Banner::Error);
        assert_eq!(page.doc.text(&page.name_error), "");
        assert_eq!(page.doc.text(&page.email_error), "This field is required.");
        assert_eq!(page.doc.text(&page.message_error), "This field is required.");
        // Values are kept so the visitor can fix them.
        assert_eq!(page.doc.value(&page.name), "Ada");
    }

    #[test]
    fn empty_submit_fills_every_slot() {
        let mut page = standard_page();
        let mut form = attached(&page.doc);
        page.doc.set_value(page.message, "   ");

        form.on_submit(&mut page.doc);
        for (input, slot) in [
            (page.name, page.name_error),
            (page.email, page.email_error),
            (page.message, page.message_error),
        ] {
            assert_eq!(page.doc.text(&slot), "This field is required.");
            assert!(page.doc.has_class(&input, "error"));
        }
        assert_eq!(form.banner(), Banner::Error);
    }

    #[test]
    fn valid_submit_resets_everything() {
        let mut page = standard_page();
        let mut form = attached(&page.doc);
        form.on_submit(&mut page.doc);
        fill_valid(&mut page);

        assert_eq!(form.on_submit(&mut page.doc), SubmitOutcome::Sent);
        assert_eq!(page.doc.text(&page.status), "Thank you! Your message has been sent.");
        assert!(page.doc.has_class(&page.status, "success"));
        assert!(!page.doc.has_class(&page.status, "error"));
        for (input, slot) in [
            (page.name, page.name_error),
            (page.email, page.email_error),
            (page.message, page.message_error),
        ] {
            assert_eq!(page.doc.value(&input), "");
            assert!(!page.doc.has_class(&input, "error"));
            assert_eq!(page.doc.text(&slot), "");
        }
        assert_eq!(form.banner(), Banner::Success);
    }

    #[test]
    fn input_clears_banner_but_not_slots() {
        let mut page = standard_page();
        let mut form = attached(&page.doc);
        form.on_submit(&mut page.doc);

        form.on_input(&mut page.doc);
        assert_eq!(page.doc.text(&page.status), "");
        assert!(!page.doc.has_class(&page.status, "error"));
        assert!(!page.doc.has_class(&page.status, "success"));
        assert_eq!(form.banner(), Banner::Idle);
        assert_eq!(page.doc.text(&page.name_error), "This field is required.");
    }

    #[test]
    fn missing_input_is_skipped() {
        let mut page = standard_page();
        let mut config = SiteConfig::default();
        config.fields.message = "no-such-input".to_string();
        let mut form = ContactForm::attach(&page.doc, &config).unwrap();
        page.doc.set_value(page.name, "Ada");
        page.doc.set_value(page.email, "ada@example.com");

        assert_eq!(form.on_submit(&mut page.doc), SubmitOutcome::Sent);
    }

    #[test]
    fn custom_messages_are_used() {
        let mut page = standard_page();
        let mut config = SiteConfig::default();
        config.messages.fix_fields = "Nope.".to_string();
        let mut form = ContactForm::attach(&page.doc, &config).unwrap();
        form.on_submit(&mut page.doc);
        assert_eq!(page.doc.text(&page.status), "Nope.");
    }
}
