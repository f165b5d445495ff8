//! Field capture for the analysis form.

use std::collections::HashMap;

use shared::domain::FieldName;

/// Current values of the free-text form fields plus any per-field messages
/// the presentation layer has recorded. Nothing here validates anything:
/// empty values are legal and simply never make it into the payload.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    values: HashMap<FieldName, String>,
    errors: HashMap<FieldName, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates a field and clears any error previously recorded for it,
    /// so stale messages do not linger once the user starts typing again.
    pub fn set_field(&mut self, name: FieldName, value: impl Into<String>) {
        self.values.insert(name, value.into());
        self.errors.remove(&name);
    }

    pub fn value(&self, name: FieldName) -> &str {
        self.values.get(&name).map(String::as_str).unwrap_or("")
    }

    /// Records a presentation-layer message against a field. The next
    /// `set_field` for the same field clears it.
    pub fn record_error(&mut self, name: FieldName, message: impl Into<String>) {
        self.errors.insert(name, message.into());
    }

    pub fn error(&self, name: FieldName) -> Option<&str> {
        self.errors.get(&name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        FieldName::ALL.iter().all(|&name| self.value(name).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_read_as_empty() {
        let fields = FormFields::new();
        assert_eq!(fields.value(FieldName::ProductName), "");
        assert!(fields.is_empty());
    }

    #[test]
    fn set_field_clears_the_recorded_error() {
        let mut fields = FormFields::new();
        fields.record_error(FieldName::Price, "price must be a number");
        assert_eq!(
            fields.error(FieldName::Price),
            Some("price must be a number")
        );

        fields.set_field(FieldName::Price, "49.99");
        assert_eq!(fields.error(FieldName::Price), None);
        assert_eq!(fields.value(FieldName::Price), "49.99");
    }

    #[test]
    fn errors_on_other_fields_survive_unrelated_edits() {
        let mut fields = FormFields::new();
        fields.record_error(FieldName::CompanyUrl, "unreachable");
        fields.set_field(FieldName::ProductName, "Widget");
        assert_eq!(fields.error(FieldName::CompanyUrl), Some("unreachable"));
    }
}
