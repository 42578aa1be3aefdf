//! Selected fundus image and its derived preview.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::engine::general_purpose;
use base64::Engine;
use image::RgbImage;

/// Upper bound on an uploaded image (16 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Longest edge of the preview thumbnail, in pixels.
const THUMBNAIL_EDGE: u32 = 96;

/// A file the user selected, as forwarded by the upload surface.
///
/// Bytes are shared so tickets handed to worker threads don't copy the
/// payload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name (without directory)
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Keep payloads out of logs.
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Renderable preview of a selected file.
#[derive(Clone)]
pub struct ImagePreview {
    /// `data:<mime>;base64,<payload>` encoding of the file
    pub data_url: String,
    /// Pixel dimensions, when the payload decodes as an image
    pub dimensions: Option<(u32, u32)>,
    /// Downscaled RGB copy for terminal display
    pub thumbnail: Option<RgbImage>,
}

impl ImagePreview {
    /// Build a preview from the file bytes.
    ///
    /// Decoding is best effort: a payload the decoder doesn't understand
    /// still gets a data URL, just no dimensions or thumbnail.
    #[must_use]
    pub fn from_file(file: &SelectedFile) -> Self {
        let encoded = general_purpose::STANDARD.encode(file.bytes());
        let data_url = format!("data:{};base64,{}", file.content_type, encoded);

        let decoded = image::ImageReader::new(Cursor::new(file.bytes()))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.decode().ok());

        let (dimensions, thumbnail) = match decoded {
            Some(img) => (
                Some((img.width(), img.height())),
                Some(img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgb8()),
            ),
            None => (None, None),
        };

        Self {
            data_url,
            dimensions,
            thumbnail,
        }
    }

    /// Length of the base64 payload inside the data URL.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.data_url
            .split_once(',')
            .map_or(0, |(_, payload)| payload.len())
    }
}

impl fmt::Debug for ImagePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePreview")
            .field("encoded_len", &self.encoded_len())
            .field("dimensions", &self.dimensions)
            .field("thumbnail", &self.thumbnail.as_ref().map(|t| t.dimensions()))
            .finish()
    }
}

/// Human-readable byte size (`1.5 MB`).
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
