use bytes::Bytes;

/// Document extensions the intake accepts, matching the storage backend's
/// allowlist.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Upload size cap, mirroring the backend's 16 MiB content-length limit.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// A document chosen for upload. Exclusively owned by the workflow machine
/// until submit, at which point it moves into the outbound parse request.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    /// Extension check against [`ALLOWED_EXTENSIONS`], case-insensitive.
    /// A name with no extension is rejected.
    pub fn has_allowed_extension(&self) -> bool {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}
