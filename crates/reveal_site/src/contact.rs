//! Contact form
//!
//! Fields are elements inside `#contact-form` carrying a `name` attribute;
//! their current value lives in the `value` attribute. Submitting checks the
//! required fields, then simulates a send: the submit button reads
//! "Sending..." and stays disabled for two seconds, after which a thank-you
//! notification appears and the form goes back to its initial values.

use reveal_core::{document, NodeId, SharedDocument, TimerQueue};
use thiserror::Error;

use crate::notify::{NotificationKind, Notifier};

pub const FORM_ID: &str = "contact-form";
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const SENT_MESSAGE: &str = "Thank you for your message! We'll get back to you soon.";
pub const SENDING_LABEL: &str = "Sending...";

/// Simulated round trip of a submission
pub const SEND_DELAY_MS: u64 = 2000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("contact form has no submit button")]
    NoSubmitButton,

    #[error("a submission is already being sent")]
    InFlight,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    document: SharedDocument,
    form: NodeId,
    /// Every field with the value it had when the form was bound
    defaults: Vec<(NodeId, Option<String>)>,
}

impl ContactForm {
    /// Bind to `#contact-form` if the page has one
    pub fn bind(document: SharedDocument) -> Option<Self> {
        let (form, defaults) = {
            let doc = document::read(&document);
            let form = doc.get_element_by_id(FORM_ID)?;
            let defaults = doc
                .subtree(form)
                .into_iter()
                .filter(|&node| node != form && doc.has_attribute(node, "name"))
                .map(|node| (node, doc.attribute(node, "value").map(str::to_string)))
                .collect();
            (form, defaults)
        };
        Some(Self {
            document,
            form,
            defaults,
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    /// The field named `name`
    pub fn field(&self, name: &str) -> Option<NodeId> {
        let doc = document::read(&self.document);
        self.defaults
            .iter()
            .map(|(node, _)| *node)
            .find(|&node| doc.attribute(node, "name") == Some(name))
    }

    /// Current value of a field; missing fields read as empty
    pub fn value(&self, name: &str) -> String {
        let Some(field) = self.field(name) else {
            return String::new();
        };
        document::read(&self.document)
            .attribute(field, "value")
            .unwrap_or_default()
            .to_string()
    }

    /// Type into a field
    pub fn set_value(&self, name: &str, value: &str) -> bool {
        let Some(field) = self.field(name) else {
            return false;
        };
        document::write(&self.document).set_attribute(field, "value", value);
        true
    }

    pub fn submit_button(&self) -> Option<NodeId> {
        let doc = document::read(&self.document);
        doc.subtree(self.form).into_iter().find(|&node| {
            doc.tag_name(node) == Some("button") && doc.attribute(node, "type") == Some("submit")
        })
    }

    /// Whether `node` is (inside) this form's submit button
    pub fn is_submit_target(&self, node: NodeId) -> bool {
        let Some(button) = self.submit_button() else {
            return false;
        };
        document::read(&self.document).contains(button, node)
    }

    /// Whether a simulated send is in progress
    pub fn is_sending(&self) -> bool {
        self.submit_button()
            .is_some_and(|button| document::read(&self.document).has_attribute(button, "disabled"))
    }

    /// Put every field back to its initial value
    pub fn reset(&self) {
        let mut doc = document::write(&self.document);
        for (field, default) in &self.defaults {
            match default {
                Some(value) => doc.set_attribute(*field, "value", value),
                None => doc.remove_attribute(*field, "value"),
            }
        }
    }

    /// Validate and send the form
    ///
    /// A missing required field shows an error notification; a valid form
    /// is "sent" after [`SEND_DELAY_MS`] on `timers`.
    pub fn submit(&self, timers: &mut TimerQueue, notifier: &Notifier) -> Result<(), FormError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|name| self.value(name).trim().is_empty())
            .collect();
        if !missing.is_empty() {
            notifier.show(timers, MISSING_FIELDS_MESSAGE, NotificationKind::Error);
            return Err(FormError::MissingFields(missing));
        }

        let button = self.submit_button().ok_or(FormError::NoSubmitButton)?;
        let label = {
            let mut doc = document::write(&self.document);
            if doc.has_attribute(button, "disabled") {
                return Err(FormError::InFlight);
            }
            let label = doc.text(button).unwrap_or_default().to_string();
            doc.set_text(button, SENDING_LABEL);
            doc.set_attribute(button, "disabled", "");
            label
        };
        tracing::debug!("ContactForm: sending");

        let form = self.clone();
        let notifier = notifier.clone();
        timers.schedule(SEND_DELAY_MS, move |timers| {
            notifier.show(timers, SENT_MESSAGE, NotificationKind::Success);
            form.reset();
            let mut doc = document::write(&form.document);
            doc.set_text(button, label);
            doc.remove_attribute(button, "disabled");
            tracing::debug!("ContactForm: sent");
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_controller::Capabilities;
    use reveal_core::Document;

    struct Fixture {
        doc: SharedDocument,
        form: ContactForm,
        button: NodeId,
        notifier: Notifier,
        timers: TimerQueue,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.create_element(body, "form");
        doc.set_attribute(form, "id", FORM_ID);
        for (tag, name) in [("input", "name"), ("input", "email"), ("input", "phone")] {
            let input = doc.create_element(form, tag);
            doc.set_attribute(input, "name", name);
        }
        let message = doc.create_element(form, "textarea");
        doc.set_attribute(message, "name", "message");
        doc.set_attribute(message, "value", "Hello");
        let button = doc.create_element(form, "button");
        doc.set_attribute(button, "type", "submit");
        doc.set_text(button, "Send Message");

        let doc = doc.into_shared();
        Fixture {
            form: ContactForm::bind(doc.clone()).unwrap(),
            notifier: Notifier::new(doc.clone(), Capabilities::without_animation()),
            doc,
            button,
            timers: TimerQueue::new(),
        }
    }

    fn notifications(doc: &SharedDocument) -> Vec<String> {
        let doc = document::read(doc);
        doc.query_class(doc.body(), "notification")
            .into_iter()
            .filter_map(|node| doc.text(node).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut fx = fixture();
        fx.form.set_value("name", "Ada");

        let err = fx.form.submit(&mut fx.timers, &fx.notifier).unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["email"]));
        assert_eq!(notifications(&fx.doc), vec![MISSING_FIELDS_MESSAGE]);
        assert!(!fx.form.is_sending());
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut fx = fixture();
        fx.form.set_value("name", "   ");
        fx.form.set_value("email", "ada@example.com");
        assert!(matches!(
            fx.form.submit(&mut fx.timers, &fx.notifier),
            Err(FormError::MissingFields(fields)) if fields == ["name"]
        ));
    }

    #[test]
    fn test_submit_round_trip() {
        let mut fx = fixture();
        fx.form.set_value("name", "Ada");
        fx.form.set_value("email", "ada@example.com");
        fx.form.set_value("message", "Quote for 500 flyers");

        fx.form.submit(&mut fx.timers, &fx.notifier).unwrap();
        assert!(fx.form.is_sending());
        assert_eq!(document::read(&fx.doc).text(fx.button), Some(SENDING_LABEL));
        assert_eq!(
            fx.form.submit(&mut fx.timers, &fx.notifier),
            Err(FormError::InFlight)
        );

        fx.timers.advance(SEND_DELAY_MS - 1);
        assert!(notifications(&fx.doc).is_empty());

        fx.timers.advance(1);
        assert_eq!(notifications(&fx.doc), vec![SENT_MESSAGE]);
        assert!(!fx.form.is_sending());
        assert_eq!(document::read(&fx.doc).text(fx.button), Some("Send Message"));
        assert_eq!(fx.form.value("name"), "");
        assert_eq!(fx.form.value("message"), "Hello");
    }

    #[test]
    fn test_no_submit_button() {
        let mut fx = fixture();
        document::write(&fx.doc).remove(fx.button).unwrap();
        for (name, value) in [("name", "a"), ("email", "b"), ("message", "c")] {
            fx.form.set_value(name, value);
        }
        assert_eq!(
            fx.form.submit(&mut fx.timers, &fx.notifier),
            Err(FormError::NoSubmitButton)
        );
    }

    #[test]
    fn test_bind_without_form() {
        assert!(ContactForm::bind(Document::new().into_shared()).is_none());
    }
}
