use super::*;
use actix_multipart::Multipart;
use actix_multipart::MultipartError;
use folio_core::Failure;
use futures::StreamExt;

fn malformed(e: MultipartError) -> Failure {
    log::debug!("multipart rejected: {}", e);
    Failure::Validation("Malformed multipart body")
}

impl Upload {
    /// Collects the `file` and `edit_mode` fields. Other fields are drained
    /// and dropped. A `file` part without a filename is not a file, nor is
    /// one whose filename and contents are both empty.
    pub async fn read(mut multipart: Multipart) -> Result<Self, Failure> {
        let mut upload = Self::default();
        while let Some(field) = multipart.next().await {
            let mut field = field.map_err(malformed)?;
            let name = field.name().unwrap_or_default().to_string();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);
            let content_type = field.content_type().map(|m| m.to_string());
            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                bytes.extend_from_slice(&chunk.map_err(malformed)?);
            }
            match (name.as_str(), filename) {
                ("file", Some(filename)) if filename.is_empty() && bytes.is_empty() => {}
                ("file", Some(filename)) if upload.file.is_none() => {
                    upload.file = Some(Attachment::new(
                        bytes,
                        &filename,
                        content_type.as_deref(),
                    ));
                }
                ("edit_mode", None) => {
                    upload.edit_mode = Some(String::from_utf8_lossy(&bytes).into_owned());
                }
                (other, _) => log::debug!("ignoring multipart field {:?}", other),
            }
        }
        Ok(upload)
    }
}
