//! Attachment types
//!
//! Attachments are references to externally stored files; the system never
//! holds file bytes. Deliverables and customer uploads share one shape,
//! tagged by file kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File kind tag for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// PDF document
    Pdf,
    /// Word document
    Docx,
    /// Image file
    Image,
    /// Anything else
    Other,
}

impl FileKind {
    /// Classify a filename by extension
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") | Some("doc") => Self::Docx,
            Some("png") | Some("jpg") | Some("jpeg") | Some("gif") | Some("webp") => Self::Image,
            _ => Self::Other,
        }
    }

    /// Singular kinds hold at most one delivered file per order; a newer
    /// delivery of the same kind replaces the previous one. `Other` has no
    /// such cap.
    pub const fn is_singular(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Image => write!(f, "image"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for FileKind {
    type Err = FileKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "image" => Ok(Self::Image),
            "other" => Ok(Self::Other),
            _ => Err(FileKindParseError(s.to_string())),
        }
    }
}

/// Error parsing a file kind string
#[derive(Debug, Clone)]
pub struct FileKindParseError(pub String);

impl std::fmt::Display for FileKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid file kind: {}", self.0)
    }
}

impl std::error::Error for FileKindParseError {}

/// Reference to an externally stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original filename
    pub filename: String,
    /// Storage URL
    pub url: String,
    /// File kind tag
    pub kind: FileKind,
    /// When the file was attached
    pub uploaded_at: DateTime<Utc>,
}

/// Which append-log an attachment belongs to on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentLog {
    /// Staff deliveries made while the order is still open
    Delivery,
    /// Deliveries recorded once the order is completed
    Completion,
    /// Files the customer uploaded
    CustomerUpload,
}

impl std::fmt::Display for AttachmentLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery => write!(f, "delivery"),
            Self::Completion => write!(f, "completion"),
            Self::CustomerUpload => write!(f, "customer_upload"),
        }
    }
}

impl std::str::FromStr for AttachmentLog {
    type Err = FileKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delivery" => Ok(Self::Delivery),
            "completion" => Ok(Self::Completion),
            "customer_upload" => Ok(Self::CustomerUpload),
            _ => Err(FileKindParseError(s.to_string())),
        }
    }
}
