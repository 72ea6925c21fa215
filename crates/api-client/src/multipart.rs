//! `multipart/form-data` uploads
//!
//! Only bulk payment registration uploads a file, so an upload carries a
//! single file part. Encoding is left to `reqwest::multipart`.

use crate::error::SdkError;
use reqwest::multipart::{Form, Part};

/// One file to upload as a `multipart/form-data` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    field: String,
    file_name: String,
    content_type: String,
    contents: Vec<u8>,
}

impl MultipartFile {
    /// Upload `contents` under `field`
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            contents: contents.into(),
        }
    }

    /// Form field name
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// File name sent in `Content-Disposition`
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Content type of the file part
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw file contents
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Build the form; fails when the part content type is not a valid MIME type
    pub fn into_form(self) -> Result<Form, SdkError> {
        let part = Part::bytes(self.contents)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|e| SdkError::config(format!("invalid part content type: {e}")))?;
        Ok(Form::new().part(self.field, part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_form() {
        let file = MultipartFile::new("file", "bulk.csv", "text/csv", b"a,b\n1,2".to_vec());
        assert_eq!(file.field(), "file");
        assert_eq!(file.contents(), b"a,b\n1,2");

        let form = file.into_form().unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn test_boundary_is_fresh_per_form() {
        let file = MultipartFile::new("file", "a.csv", "text/csv", Vec::new());
        let a = file.clone().into_form().unwrap();
        let b = file.into_form().unwrap();
        assert_ne!(a.boundary(), b.boundary());
    }

    #[test]
    fn test_invalid_content_type_rejected() {
        let err = MultipartFile::new("file", "a.csv", "not a mime", Vec::new())
            .into_form()
            .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
