//! Assembles captured fields and the optional attachment into the
//! multipart payload the analysis service expects. Pure transformation:
//! no network I/O happens here.

use reqwest::multipart::{Form, Part};
use shared::domain::FieldName;

use crate::attachment::Attachment;

pub const FILE_PART_NAME: &str = "file";
const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPart {
    pub name: FieldName,
    pub value: String,
}

/// Transport-ready payload. Part ordering follows form order but is not a
/// contract the service may rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisPayload {
    pub text_parts: Vec<TextPart>,
    pub file: Option<Attachment>,
}

impl AnalysisPayload {
    /// One text part per non-empty field; the attachment as the `file`
    /// part iff present. Empty fields produce no part at all.
    pub fn build(fields: &crate::form::FormFields, attachment: Option<Attachment>) -> Self {
        let text_parts = FieldName::ALL
            .iter()
            .filter_map(|&name| {
                let value = fields.value(name);
                if value.is_empty() {
                    None
                } else {
                    Some(TextPart {
                        name,
                        value: value.to_string(),
                    })
                }
            })
            .collect();

        Self {
            text_parts,
            file: attachment,
        }
    }

    pub fn into_form(self) -> reqwest::Result<Form> {
        let mut form = Form::new();
        for part in self.text_parts {
            form = form.text(part.name.as_str(), part.value);
        }
        if let Some(file) = self.file {
            let mime = file.mime_type.unwrap_or_else(|| FALLBACK_MIME.to_string());
            let part = Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str(&mime)?;
            form = form.part(FILE_PART_NAME, part);
        }
        Ok(form)
    }
}
