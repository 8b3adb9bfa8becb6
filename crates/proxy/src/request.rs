use folio_core::EDIT_MODE;
use folio_core::Failure;
use folio_core::UPLOAD_CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;

/// A file received from the caller, relayed as-is.
#[derive(Debug, Clone)]
pub struct Attachment {
    bytes: Vec<u8>,
    filename: String,
    content_type: String,
}

impl Attachment {
    pub fn new(bytes: Vec<u8>, filename: &str, content_type: Option<&str>) -> Self {
        Self {
            bytes,
            filename: filename.to_string(),
            content_type: content_type
                .map(str::trim)
                .filter(|ct| !ct.is_empty())
                .unwrap_or(UPLOAD_CONTENT_TYPE)
                .to_string(),
        }
    }
    pub fn filename(&self) -> &str {
        &self.filename
    }
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file: Option<Attachment>,
    pub edit_mode: Option<String>,
}

impl Upload {
    pub fn new(file: Attachment) -> Self {
        Self {
            file: Some(file),
            edit_mode: None,
        }
    }
    pub fn with_edit_mode(self, edit_mode: &str) -> Self {
        Self {
            edit_mode: Some(edit_mode.to_string()),
            ..self
        }
    }
    /// Absent or blank falls back to the default mode; anything else is
    /// forwarded verbatim.
    pub fn edit_mode(&self) -> &str {
        present(&self.edit_mode).unwrap_or(EDIT_MODE)
    }
}

/// One conversational turn. Also the exact JSON body sent downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    pub session_id: Option<String>,
    pub message: Option<String>,
}

impl Chat {
    pub fn new(session_id: &str, message: &str) -> Self {
        Self {
            session_id: Some(session_id.to_string()),
            message: Some(message.to_string()),
        }
    }
    pub fn required(&self) -> Result<(&str, &str), Failure> {
        match (present(&self.session_id), present(&self.message)) {
            (Some(s), Some(m)) => Ok((s, m)),
            _ => Err(Failure::Validation("Session ID and message are required")),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_mode_defaults_when_blank() {
        let file = Attachment::new(b"%PDF".to_vec(), "a.pdf", None);
        assert_eq!(Upload::new(file.clone()).edit_mode(), "minimal");
        assert_eq!(Upload::new(file.clone()).with_edit_mode("  ").edit_mode(), "minimal");
        assert_eq!(Upload::new(file.clone()).with_edit_mode("aggressive").edit_mode(), "aggressive");
        assert_eq!(Upload::new(file).with_edit_mode(" aggressive ").edit_mode(), " aggressive ");
    }

    #[test]
    fn content_type_defaults_to_pdf() {
        assert_eq!(Attachment::new(vec![], "a", None).content_type(), "application/pdf");
        assert_eq!(Attachment::new(vec![], "a", Some("")).content_type(), "application/pdf");
        assert_eq!(
            Attachment::new(vec![], "a", Some("text/plain")).content_type(),
            "text/plain"
        );
    }

    #[test]
    fn chat_requires_both_fields() {
        assert!(Chat::new("s1", "hello").required().is_ok());
        assert!(Chat::new("s1", "").required().is_err());
        assert!(Chat::new(" ", "hello").required().is_err());
        assert!(Chat::default().required().is_err());
        assert_eq!(Chat::new("s1", " hi ").required().unwrap(), ("s1", " hi "));
    }
}
