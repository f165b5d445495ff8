use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(SubmissionId);

/// Closed set of form fields accepted by the analysis service. The wire
/// name of each field doubles as its multipart part name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    ProductName,
    ProductDescription,
    Price,
    CompanyUrl,
    Competitors,
    AdditionalNotes,
}

impl FieldName {
    /// All fields in the order the form presents them.
    pub const ALL: [FieldName; 6] = [
        FieldName::ProductName,
        FieldName::ProductDescription,
        FieldName::Price,
        FieldName::CompanyUrl,
        FieldName::Competitors,
        FieldName::AdditionalNotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::ProductName => "productName",
            FieldName::ProductDescription => "productDescription",
            FieldName::Price => "price",
            FieldName::CompanyUrl => "companyUrl",
            FieldName::Competitors => "competitors",
            FieldName::AdditionalNotes => "additionalNotes",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_wire_names_match_the_service_contract() {
        let names: Vec<&str> = FieldName::ALL.iter().map(FieldName::as_str).collect();
        assert_eq!(
            names,
            [
                "productName",
                "productDescription",
                "price",
                "companyUrl",
                "competitors",
                "additionalNotes",
            ]
        );
    }
}
