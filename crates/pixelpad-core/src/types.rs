//! Core data model: source assets, encode candidates, output artifacts and
//! the user-selectable options that drive a processing run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

/// Bytes per kilobyte for size targets and labels.
pub const KIB: u64 = 1024;

/// Bytes per megabyte for size targets and labels.
pub const MIB: u64 = 1024 * 1024;

/// File formats accepted as input and produced as output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl MimeType {
    /// Canonical MIME string.
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Jpeg => "image/jpeg",
            MimeType::Png => "image/png",
            MimeType::Webp => "image/webp",
            MimeType::Pdf => "application/pdf",
        }
    }

    /// Default file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MimeType::Jpeg => "jpg",
            MimeType::Png => "png",
            MimeType::Webp => "webp",
            MimeType::Pdf => "pdf",
        }
    }

    /// Whether the encoder honours a quality setting for this format.
    ///
    /// PDF output counts as lossy because its page is a JPEG stream.
    pub fn is_lossy(self) -> bool {
        !matches!(self, MimeType::Png)
    }

    /// Parse a MIME string. Only the four supported types are recognized.
    pub fn parse(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MimeType::Jpeg),
            "image/png" => Some(MimeType::Png),
            "image/webp" => Some(MimeType::Webp),
            "application/pdf" => Some(MimeType::Pdf),
            _ => None,
        }
    }

    /// Resolve the MIME type of an uploaded file.
    ///
    /// A non-empty declared type wins and must be supported. Without one the
    /// file-name suffix decides, defaulting to JPEG.
    pub fn resolve(declared: &str, file_name: Option<&str>) -> Result<Self, ProcessError> {
        let declared = declared.trim();
        if !declared.is_empty() {
            return Self::parse(declared)
                .ok_or_else(|| ProcessError::UnsupportedInputFormat(declared.to_string()));
        }

        let lower = file_name.unwrap_or_default().to_ascii_lowercase();
        let mime = if lower.ends_with(".pdf") {
            MimeType::Pdf
        } else if lower.ends_with(".png") {
            MimeType::Png
        } else if lower.ends_with(".webp") {
            MimeType::Webp
        } else {
            MimeType::Jpeg
        };
        Ok(mime)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable input file.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    bytes: Vec<u8>,
    mime: MimeType,
    file_name: Option<String>,
}

impl SourceAsset {
    pub fn new(bytes: Vec<u8>, mime: MimeType) -> Self {
        Self {
            bytes,
            mime,
            file_name: None,
        }
    }

    /// Build an asset from an upload, resolving its MIME type.
    pub fn from_upload(
        bytes: Vec<u8>,
        declared_mime: &str,
        file_name: Option<&str>,
    ) -> Result<Self, ProcessError> {
        let mime = MimeType::resolve(declared_mime, file_name)?;
        let mut asset = Self::new(bytes, mime);
        asset.file_name = file_name.filter(|n| !n.is_empty()).map(str::to_string);
        Ok(asset)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> MimeType {
        self.mime
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Extension of the uploaded file name, falling back to the MIME default.
    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or(self.mime.extension())
            .to_string()
    }
}

/// Result of one encode attempt during the size search.
#[derive(Debug, Clone)]
pub struct EncodedCandidate {
    bytes: Vec<u8>,
    mime: MimeType,
    quality: f32,
}

impl EncodedCandidate {
    pub fn new(bytes: Vec<u8>, mime: MimeType, quality: f32) -> Self {
        Self {
            bytes,
            mime,
            quality,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime(&self) -> MimeType {
        self.mime
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

/// Final product of a processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    bytes: Vec<u8>,
    mime: MimeType,
    extension: String,
    delta: i64,
}

impl OutputArtifact {
    /// Create an artifact, recording its size change against `source_len`.
    pub fn new(
        bytes: Vec<u8>,
        mime: MimeType,
        extension: impl Into<String>,
        source_len: usize,
    ) -> Self {
        let delta = bytes.len() as i64 - source_len as i64;
        Self {
            bytes,
            mime,
            extension: extension.into(),
            delta,
        }
    }

    /// Wrap the untouched source bytes.
    pub fn unchanged(source: &SourceAsset) -> Self {
        Self::new(
            source.bytes().to_vec(),
            source.mime(),
            source.extension(),
            source.byte_len(),
        )
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime(&self) -> MimeType {
        self.mime
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Signed size change in bytes relative to the source.
    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// Download name, e.g. `pixelpad-1700000000000.jpg`.
    pub fn suggested_file_name(&self, timestamp_ms: u64) -> String {
        format!("pixelpad-{}.{}", timestamp_ms, self.extension)
    }
}

/// Unit attached to a size target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    #[default]
    Kb,
    Mb,
}

impl SizeUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            SizeUnit::Kb => KIB,
            SizeUnit::Mb => MIB,
        }
    }
}

impl FromStr for SizeUnit {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KB" => Ok(SizeUnit::Kb),
            "MB" => Ok(SizeUnit::Mb),
            _ => Err(ProcessError::UnknownOption {
                kind: "size unit",
                value: s.to_string(),
            }),
        }
    }
}

/// Requested output size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTarget {
    pub value: f64,
    pub unit: SizeUnit,
}

impl SizeTarget {
    pub fn new(value: f64, unit: SizeUnit) -> Self {
        Self { value, unit }
    }

    pub fn kilobytes(value: f64) -> Self {
        Self::new(value, SizeUnit::Kb)
    }

    pub fn megabytes(value: f64) -> Self {
        Self::new(value, SizeUnit::Mb)
    }

    /// Convert to a whole number of bytes, rounding to the nearest byte.
    pub fn to_bytes(self) -> Result<u64, ProcessError> {
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(ProcessError::InvalidTarget);
        }
        let bytes = (self.value * self.unit.multiplier() as f64).round();
        if bytes >= u64::MAX as f64 {
            return Err(ProcessError::InvalidTarget);
        }
        Ok(bytes as u64)
    }
}

/// Output format selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Keep the input format.
    #[default]
    Original,
    Jpeg,
    Png,
    Webp,
    Pdf,
}

/// Concrete output settings after resolving `OutputFormat::Original`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub mime: MimeType,
    pub extension: String,
    pub is_original: bool,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Original => "original",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// MIME type for an explicit choice, `None` for `Original`.
    pub fn mime(self) -> Option<MimeType> {
        match self {
            OutputFormat::Original => None,
            OutputFormat::Jpeg => Some(MimeType::Jpeg),
            OutputFormat::Png => Some(MimeType::Png),
            OutputFormat::Webp => Some(MimeType::Webp),
            OutputFormat::Pdf => Some(MimeType::Pdf),
        }
    }

    pub fn resolve(self, source: &SourceAsset) -> OutputSpec {
        match self.mime() {
            Some(mime) => OutputSpec {
                mime,
                extension: mime.extension().to_string(),
                is_original: false,
            },
            None => OutputSpec {
                mime: source.mime(),
                extension: source.extension(),
                is_original: true,
            },
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(OutputFormat::Original),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ProcessError::UnknownOption {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}

/// Processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Compress,
    Enlarge,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Compress => "compress",
            Mode::Enlarge => "enlarge",
        }
    }
}

impl FromStr for Mode {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compress" => Ok(Mode::Compress),
            "enlarge" => Ok(Mode::Enlarge),
            _ => Err(ProcessError::UnknownOption {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}
