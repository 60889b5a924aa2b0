use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use thiserror::Error;

/// Extensions accepted for uploaded images.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

#[derive(Debug, Error)]
pub enum UploadFormError {
    #[error("uploaded file is empty")]
    Empty,
    #[error("unsupported image type `{0}`")]
    UnsupportedType(String),
    #[error("error reading uploaded file")]
    Read(#[from] std::io::Error),
}

/// Raw image bytes together with the name supplied by the browser.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(MultipartForm)]
/// Multipart form carrying a single image file.
pub struct ImageUploadForm {
    #[multipart(limit = "5MB")]
    pub image: TempFile,
}

impl ImageUploadForm {
    pub fn into_upload(self) -> Result<ImageUpload, UploadFormError> {
        read_image(self.image)
    }
}

/// Reads an uploaded image, checking that it is non-empty and has an image extension.
pub fn read_image(mut file: TempFile) -> Result<ImageUpload, UploadFormError> {
    let file_name = file.file_name.clone().unwrap_or_default();
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadFormError::UnsupportedType(file_name));
    }

    file.file.rewind()?;
    let mut bytes = Vec::with_capacity(file.size);
    file.file.read_to_end(&mut bytes)?;

    if bytes.is_empty() {
        return Err(UploadFormError::Empty);
    }

    Ok(ImageUpload { file_name, bytes })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::{Seek, SeekFrom, Write};

    use tempfile::NamedTempFile;

    use super::*;

    pub(crate) fn temp_upload(name: &str, contents: &[u8]) -> TempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents).expect("write temp file");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        TempFile {
            file,
            content_type: None,
            file_name: Some(name.to_string()),
            size: contents.len(),
        }
    }

    #[test]
    fn read_image_returns_bytes() {
        let upload = read_image(temp_upload("front.PNG", b"\x89PNG")).expect("image");

        assert_eq!(upload.file_name, "front.PNG");
        assert_eq!(upload.bytes, b"\x89PNG");
    }

    #[test]
    fn read_image_rejects_other_types() {
        let result = read_image(temp_upload("notes.txt", b"hello"));

        assert!(matches!(result, Err(UploadFormError::UnsupportedType(name)) if name == "notes.txt"));
    }

    #[test]
    fn read_image_rejects_empty_files() {
        let result = read_image(temp_upload("empty.jpg", b""));

        assert!(matches!(result, Err(UploadFormError::Empty)));
    }
}
