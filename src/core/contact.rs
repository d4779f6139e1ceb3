use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
        };
        f.write_str(label)
    }
}

/// Pre-flight result for the contact form; field errors are meant to be shown
/// next to their inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub field_errors: BTreeMap<ContactField, String>,
}

impl ValidationReport {
    pub fn error_for(&self, field: ContactField) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn summary(&self) -> String {
        self.field_errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

pub fn validate_contact(contact: &ContactInfo) -> ValidationReport {
    let mut field_errors = BTreeMap::new();

    if contact.name.trim().is_empty() {
        field_errors.insert(ContactField::Name, "Name is required".to_string());
    }

    if contact.email.trim().is_empty() {
        field_errors.insert(ContactField::Email, "Email is required".to_string());
    } else if !email_pattern().is_match(&contact.email) {
        field_errors.insert(ContactField::Email, "Email is invalid".to_string());
    }

    if contact.phone.trim().is_empty() {
        field_errors.insert(ContactField::Phone, "Phone number is required".to_string());
    }

    ValidationReport {
        valid: field_errors.is_empty(),
        field_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ContactInfo {
        ContactInfo {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1 555 123 4567".to_string(),
            company: None,
            message: String::new(),
        }
    }

    #[test]
    fn test_complete_contact_is_valid() {
        let report = validate_contact(&complete());
        assert!(report.valid);
        assert!(report.field_errors.is_empty());
    }

    #[test]
    fn test_empty_email_is_reported() {
        let contact = ContactInfo {
            email: String::new(),
            ..complete()
        };
        let report = validate_contact(&contact);
        assert!(!report.valid);
        assert_eq!(report.error_for(ContactField::Email), Some("Email is required"));
        assert_eq!(report.field_errors.len(), 1);
    }

    #[test]
    fn test_malformed_email_and_blank_fields() {
        let contact = ContactInfo {
            name: "   ".to_string(),
            email: "jane@example".to_string(),
            phone: String::new(),
            ..complete()
        };
        let report = validate_contact(&contact);
        assert_eq!(report.error_for(ContactField::Name), Some("Name is required"));
        assert_eq!(report.error_for(ContactField::Email), Some("Email is invalid"));
        assert_eq!(report.error_for(ContactField::Phone), Some("Phone number is required"));
        assert_eq!(
            report.summary(),
            "name: Name is required; email: Email is invalid; phone: Phone number is required"
        );
    }
}
