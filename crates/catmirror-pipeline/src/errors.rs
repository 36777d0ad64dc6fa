use std::collections::BTreeMap;

use serde::Serialize;

/// Field-level and top-level error messages for a product mutation.
///
/// Field names match the remote payload and form fields: `title`, `price`,
/// `description`, `categoryId`, `image_url`, `image`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
    message: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An error set carrying only a top-level message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            message: Some(message.into()),
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Replaces the top-level message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Appends every field message of `other`; its top-level message wins
    /// only when this set has none.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
        if self.message.is_none() {
            self.message = other.message;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.message.is_none()
    }

    /// Messages recorded for `field`, empty when it has none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Fields with errors, in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        if let Some(message) = &self.message {
            write!(f, "{message}")?;
            first = false;
        }
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("title", "This field is required.");
        errors.add("title", "Too long.");
        errors.add("price", "Enter a number.");

        assert_eq!(errors.get("title").len(), 2);
        assert_eq!(errors.get("description"), &[] as &[String]);
        let names: Vec<&str> = errors.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["price", "title"]);
    }

    #[test]
    fn merge_keeps_existing_message() {
        let mut errors = FieldErrors::with_message("first");
        let mut other = FieldErrors::with_message("second");
        other.add("image", "upload failed");

        errors.merge(other);

        assert_eq!(errors.message(), Some("first"));
        assert_eq!(errors.get("image"), &["upload failed".to_string()]);
    }

    #[test]
    fn display_lists_message_then_fields() {
        let mut errors = FieldErrors::with_message("Please correct the errors below.");
        errors.add("price", "Enter a number.");
        assert_eq!(
            errors.to_string(),
            "Please correct the errors below.; price: Enter a number."
        );
    }

    #[test]
    fn empty_set_reports_empty() {
        assert!(FieldErrors::new().is_empty());
        assert!(!FieldErrors::with_message("x").is_empty());
    }
}
