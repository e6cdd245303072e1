//! Minimal `multipart/form-data` body with a single file part.

use super::UploadFile;

/// Form field name expected by the upload endpoint.
pub(crate) const FILE_FIELD: &str = "file";

pub(crate) struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub(crate) fn single_file(file: &UploadFile) -> MultipartBody {
    let boundary = format!("----unicorn-board-{}", uuid::Uuid::new_v4().simple());
    let file_name = file.file_name.replace(['"', '\r', '\n'], "_");
    let mut bytes = Vec::with_capacity(file.bytes.len() + 256);
    bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    bytes.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    bytes.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    bytes.extend_from_slice(&file.bytes);
    bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}
