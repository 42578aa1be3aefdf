//! Upload surface: file selection and validation.
//!
//! Two ways in, one validation path:
//! - browse: the user types a path and submits it
//! - drop: the terminal pastes a path when a file is dropped onto it
//!
//! A selection is either rejected with a user-visible message or forwarded
//! to the caller as a `SelectedFile`. No preview is generated here.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{SelectedFile, MAX_UPLOAD_BYTES};

/// Declared type for files whose extension is not a known image format.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Why a selection was refused. `Display` is the alert text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Please select a valid image file")]
    NotAnImage,

    #[error("File size must be less than 16MB")]
    TooLarge,

    #[error("Could not read the selected file")]
    Unreadable,
}

/// How the selection reached the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Browse,
    Drop,
}

/// What is known about a file before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl FileCandidate {
    /// Describe a file on disk from its name and metadata.
    ///
    /// # Errors
    /// Returns `Unreadable` if the path is missing or not a regular file.
    pub fn from_path(path: &Path) -> Result<Self, UploadRejection> {
        let metadata = fs::metadata(path).map_err(|_| UploadRejection::Unreadable)?;
        if !metadata.is_file() {
            return Err(UploadRejection::Unreadable);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            content_type: declared_content_type(path),
            size: metadata.len(),
        })
    }
}

/// Check a candidate. Type first, then size; the first failure wins.
///
/// # Errors
/// Returns the rejection to show the user.
pub fn validate(candidate: &FileCandidate) -> Result<(), UploadRejection> {
    if !candidate.content_type.starts_with("image/") {
        return Err(UploadRejection::NotAnImage);
    }
    if candidate.size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

/// MIME type implied by the file extension.
#[must_use]
pub fn declared_content_type(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_CONTENT_TYPE.to_string())
}

/// Path typed into the entry field. Only surrounding whitespace and
/// quotes are removed; everything else is taken literally.
#[must_use]
pub fn normalize_typed_path(raw: &str) -> PathBuf {
    PathBuf::from(strip_quotes(raw.trim()))
}

/// Path pasted by the terminal when a file is dropped onto it.
///
/// Emulators deliver the path quoted, as a percent-encoded `file://` URL,
/// or with shell-special characters backslash-escaped.
#[must_use]
pub fn normalize_dropped_path(raw: &str) -> PathBuf {
    // Several files dropped at once: take the first.
    let first = raw.trim().lines().next().unwrap_or_default().trim();

    let unquoted = strip_quotes(first);
    if unquoted.len() != first.len() {
        return PathBuf::from(unquoted);
    }

    if first.starts_with("file://") {
        if let Some(path) = reqwest::Url::parse(first)
            .ok()
            .and_then(|url| url.to_file_path().ok())
        {
            return path;
        }
    }

    if cfg!(windows) {
        PathBuf::from(first)
    } else {
        PathBuf::from(unescape_shell(first))
    }
}

fn strip_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Drop the backslash in front of every escaped character.
fn unescape_shell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Upload surface state: the path entry field.
#[derive(Debug, Default)]
pub struct UploadSurface {
    path_input: String,
}

impl UploadSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the path entry field.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.path_input
    }

    pub fn input_char(&mut self, c: char) {
        self.path_input.push(c);
    }

    pub fn delete_char(&mut self) {
        self.path_input.pop();
    }

    pub fn clear_input(&mut self) {
        self.path_input.clear();
    }

    /// Submit the typed path.
    ///
    /// Returns `Ok(None)` when the field is empty (nothing was chosen).
    ///
    /// # Errors
    /// Returns the rejection to show as an alert.
    pub fn submit(&mut self) -> Result<Option<SelectedFile>, UploadRejection> {
        if self.path_input.trim().is_empty() {
            return Ok(None);
        }
        let path = normalize_typed_path(&self.path_input);
        let file = Self::accept(SelectionSource::Browse, &path)?;
        self.path_input.clear();
        Ok(Some(file))
    }

    /// Handle a file dropped (pasted) onto the terminal.
    ///
    /// # Errors
    /// Returns the rejection to show as an alert.
    pub fn drop_file(&mut self, raw: &str) -> Result<Option<SelectedFile>, UploadRejection> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let path = normalize_dropped_path(raw);
        let file = Self::accept(SelectionSource::Drop, &path)?;
        self.path_input.clear();
        Ok(Some(file))
    }

    /// Shared validation path for both selection modes.
    fn accept(source: SelectionSource, path: &Path) -> Result<SelectedFile, UploadRejection> {
        let candidate = FileCandidate::from_path(path).inspect_err(|rejection| {
            tracing::info!(?source, %rejection, "Selection rejected");
        })?;

        if let Err(rejection) = validate(&candidate) {
            tracing::info!(
                ?source,
                content_type = %candidate.content_type,
                size = candidate.size,
                %rejection,
                "Selection rejected"
            );
            return Err(rejection);
        }

        let bytes = fs::read(path).map_err(|e| {
            tracing::warn!(?source, error = %e, "Failed to read selected file");
            UploadRejection::Unreadable
        })?;

        // The file may have grown between stat and read.
        if bytes.len() as u64 > MAX_UPLOAD_BYTES {
            return Err(UploadRejection::TooLarge);
        }

        tracing::info!(
            ?source,
            content_type = %candidate.content_type,
            size = bytes.len(),
            "Image selected"
        );
        Ok(SelectedFile::new(candidate.name, candidate.content_type, bytes))
    }
}
