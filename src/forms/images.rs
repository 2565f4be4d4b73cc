use actix_multipart::form::{MultipartForm, tempfile::TempFile};

/// Multipart body of `POST /api/images`.
#[derive(MultipartForm)]
pub struct UploadImageForm {
    #[multipart(limit = "5MiB")]
    pub file: TempFile,
}
