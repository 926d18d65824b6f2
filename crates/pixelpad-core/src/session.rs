//! Processing session: the compress / enlarge state machine.
//!
//! A [`Session`] owns the loaded source, the current output artifact and the
//! status line. Switching mode or output format, loading a new file, or
//! running again drops the previous artifact.

use crate::codec::Codec;
use crate::config::ProcessConfig;
use crate::convert::encode_source;
use crate::error::{Conversion, ProcessError};
use crate::padding::pad_with_marker;
use crate::search::search_quality;
use crate::types::{
    MimeType, Mode, OutputArtifact, OutputFormat, OutputSpec, SizeTarget, SourceAsset,
};

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    /// A result was produced but it misses what was asked for.
    Warning,
    Error,
}

/// What the last operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Idle,
    Ready,
    PdfLoaded,
    ModeChanged,
    FormatChanged,
    Compressed,
    KeptOriginalSize,
    TargetTooSmall,
    LosslessReencode,
    Enlarged,
    TargetNotLarger,
    Failed,
}

impl StatusCode {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::Idle => "idle",
            StatusCode::Ready => "ready",
            StatusCode::PdfLoaded => "pdf_loaded",
            StatusCode::ModeChanged => "mode_changed",
            StatusCode::FormatChanged => "format_changed",
            StatusCode::Compressed => "compressed",
            StatusCode::KeptOriginalSize => "kept_original_size",
            StatusCode::TargetTooSmall => "target_too_small",
            StatusCode::LosslessReencode => "lossless_reencode",
            StatusCode::Enlarged => "enlarged",
            StatusCode::TargetNotLarger => "target_not_larger",
            StatusCode::Failed => "failed",
        }
    }
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// User-visible status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: StatusCode,
    pub message: String,
}

impl Status {
    fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn failed(err: &ProcessError) -> Self {
        Self::new(StatusCode::Failed, err.to_string())
    }

    pub fn severity(&self) -> Severity {
        match self.code {
            StatusCode::Failed => Severity::Error,
            StatusCode::TargetTooSmall => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() != Severity::Info
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new(StatusCode::Idle, "Upload a file to get started.")
    }
}

/// Orchestrates one source file through compress or enlarge runs.
pub struct Session<C> {
    codec: C,
    config: ProcessConfig,
    mode: Mode,
    output_format: OutputFormat,
    source: Option<SourceAsset>,
    output: Option<OutputArtifact>,
    status: Status,
}

impl<C: Codec> Session<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            config: ProcessConfig::default(),
            mode: Mode::default(),
            output_format: OutputFormat::default(),
            source: None,
            output: None,
            status: Status::default(),
        }
    }

    pub fn with_config(codec: C, config: ProcessConfig) -> Result<Self, ProcessError> {
        config.validate()?;
        let mut session = Self::new(codec);
        session.config = config;
        Ok(session)
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn source(&self) -> Option<&SourceAsset> {
        self.source.as_ref()
    }

    pub fn output(&self) -> Option<&OutputArtifact> {
        self.output.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Drop the current artifact, releasing its buffer.
    pub fn reset_output(&mut self) {
        self.output = None;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset_output();
        let message = match mode {
            Mode::Compress => "Adjust compression level, then process.",
            Mode::Enlarge => "Set a target size to safely pad the file.",
        };
        self.status = Status::new(StatusCode::ModeChanged, message);
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
        self.reset_output();
        self.status = Status::new(
            StatusCode::FormatChanged,
            "Output format updated. Process to apply changes.",
        );
    }

    /// Replace the source file.
    pub fn load(&mut self, asset: SourceAsset) {
        self.reset_output();
        self.status = if asset.mime() == MimeType::Pdf {
            Status::new(
                StatusCode::PdfLoaded,
                "PDF loaded. You can enlarge via safe padding. Compression is limited without re-rendering.",
            )
        } else {
            Status::new(
                StatusCode::Ready,
                "Ready to process. All changes stay on your device.",
            )
        };
        log::info!(
            "loaded {} source ({} bytes)",
            asset.mime(),
            asset.byte_len()
        );
        self.source = Some(asset);
    }

    /// Load an upload, rejecting unsupported MIME types.
    ///
    /// A rejected upload leaves the previous source in place.
    pub fn load_upload(
        &mut self,
        bytes: Vec<u8>,
        declared_mime: &str,
        file_name: Option<&str>,
    ) -> Result<(), ProcessError> {
        match SourceAsset::from_upload(bytes, declared_mime, file_name) {
            Ok(asset) => {
                self.load(asset);
                Ok(())
            }
            Err(e) => {
                self.status = Status::failed(&e);
                Err(e)
            }
        }
    }

    /// Record a failure that happened outside a run, such as an unparseable
    /// option coming from the page. Drops the current artifact.
    pub fn fail(&mut self, err: &ProcessError) {
        log::warn!("{:?} run rejected: {}", self.mode, err);
        self.reset_output();
        self.status = Status::failed(err);
    }

    /// Run the current mode against `target`.
    ///
    /// On success the new artifact replaces the previous one. On failure the
    /// status carries the error message and the previous artifact is dropped.
    pub fn process(&mut self, target: SizeTarget) -> Result<&OutputArtifact, ProcessError> {
        self.reset_output();
        match self.run(target) {
            Ok((artifact, status)) => {
                log::info!(
                    "{:?} run produced {} {} bytes ({:+})",
                    self.mode,
                    artifact.mime(),
                    artifact.byte_len(),
                    artifact.delta()
                );
                self.status = status;
                Ok(self.output.insert(artifact))
            }
            Err(e) => {
                log::warn!("{:?} run failed: {}", self.mode, e);
                self.status = Status::failed(&e);
                Err(e)
            }
        }
    }

    fn run(&self, target: SizeTarget) -> Result<(OutputArtifact, Status), ProcessError> {
        let source = self.source.as_ref().ok_or(ProcessError::NoSource)?;
        let spec = self.output_format.resolve(source);

        if source.mime() == MimeType::Pdf && spec.mime != MimeType::Pdf {
            return Err(ProcessError::UnsupportedConversion(Conversion::PdfToImage));
        }

        match self.mode {
            Mode::Compress => self.compress(source, &spec, target),
            Mode::Enlarge => self.enlarge(source, &spec, target),
        }
    }

    fn compress(
        &self,
        source: &SourceAsset,
        spec: &OutputSpec,
        target: SizeTarget,
    ) -> Result<(OutputArtifact, Status), ProcessError> {
        if source.mime() == MimeType::Pdf {
            return Err(ProcessError::UnsupportedConversion(Conversion::PdfCompression));
        }
        let target_bytes = target.to_bytes()?;
        let source_len = source.byte_len();

        let artifact = if target_bytes >= source_len as u64 {
            if spec.mime == source.mime() {
                OutputArtifact::unchanged(source)
            } else {
                self.reencode(source, spec)
            }
        } else {
            let outcome = search_quality(
                &self.codec,
                source,
                target_bytes,
                spec.mime,
                &self.config.search,
            );
            match outcome.into_candidate() {
                Some(candidate) => OutputArtifact::new(
                    candidate.into_bytes(),
                    spec.mime,
                    spec.extension.clone(),
                    source_len,
                ),
                None => OutputArtifact::unchanged(source),
            }
        };

        let status = if artifact.byte_len() == source_len {
            Status::new(
                StatusCode::KeptOriginalSize,
                "Compression kept the original size. Enter a smaller target or try a JPEG/WEBP file.",
            )
        } else if artifact.byte_len() as u64 > target_bytes {
            if artifact.mime().is_lossy() {
                log::warn!(
                    "target {} bytes unreachable, smallest is {} bytes",
                    target_bytes,
                    artifact.byte_len()
                );
                Status::new(
                    StatusCode::TargetTooSmall,
                    "Reached the smallest safe size, but the target is too small for this image.",
                )
            } else {
                Status::new(
                    StatusCode::LosslessReencode,
                    "PNG is lossless, so it was re-encoded at full fidelity without size targeting.",
                )
            }
        } else {
            Status::new(
                StatusCode::Compressed,
                "Compression complete with visual parity preserved.",
            )
        };

        Ok((artifact, status))
    }

    fn enlarge(
        &self,
        source: &SourceAsset,
        spec: &OutputSpec,
        target: SizeTarget,
    ) -> Result<(OutputArtifact, Status), ProcessError> {
        let target_bytes = target.to_bytes()?;

        // Same-format output keeps the source bytes so the padded file decodes
        // to identical pixels. PDFs are never re-encoded.
        let base = if spec.is_original || spec.mime == source.mime() {
            OutputArtifact::new(
                source.bytes().to_vec(),
                source.mime(),
                spec.extension.clone(),
                source.byte_len(),
            )
        } else {
            self.reencode(source, spec)
        };

        if target_bytes <= base.byte_len() as u64 {
            let status = Status::new(
                StatusCode::TargetNotLarger,
                "Target size is smaller than or equal to the current file. Increase the target for padding.",
            );
            return Ok((base, status));
        }

        let too_large = || ProcessError::TargetTooLarge(target_bytes);
        let target_len = usize::try_from(target_bytes).map_err(|_| too_large())?;
        let mime = base.mime();
        let extension = base.extension().to_string();
        let padded = pad_with_marker(
            base.into_bytes(),
            target_len,
            self.config.padding_marker.as_bytes(),
        )
        .map_err(|_| too_large())?;
        let artifact = OutputArtifact::new(padded, mime, extension, source.byte_len());
        let status = Status::new(
            StatusCode::Enlarged,
            "Enlarged safely using metadata padding. Pixels unchanged.",
        );
        Ok((artifact, status))
    }

    /// High-quality re-encode to the requested format, or the source
    /// unchanged if the codec cannot produce it.
    fn reencode(&self, source: &SourceAsset, spec: &OutputSpec) -> OutputArtifact {
        match encode_source(&self.codec, source, spec.mime, self.config.high_quality) {
            Ok(bytes) => {
                OutputArtifact::new(bytes, spec.mime, spec.extension.clone(), source.byte_len())
            }
            Err(e) => {
                log::warn!("re-encode to {} failed, keeping original: {}", spec.mime, e);
                OutputArtifact::unchanged(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodedImage, ImageCodec};
    use crate::padding::PADDING_MARKER;
    use crate::search::test_support::SizedCodec;

    fn session_with(codec: SizedCodec, asset: SourceAsset) -> Session<SizedCodec> {
        let mut session = Session::new(codec);
        session.load(asset);
        session
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new(SizedCodec::new(0, 0));
        assert_eq!(session.mode(), Mode::Compress);
        assert_eq!(session.output_format(), OutputFormat::Original);
        assert_eq!(session.status().code, StatusCode::Idle);
        assert!(session.output().is_none());
    }

    #[test]
    fn test_process_without_source() {
        let mut session = Session::new(SizedCodec::new(0, 0));
        let result = session.process(SizeTarget::kilobytes(100.0));
        assert!(matches!(result, Err(ProcessError::NoSource)));
        assert_eq!(session.status().code, StatusCode::Failed);
        assert_eq!(session.status().message, "Upload an image first.");
        assert!(session.status().is_error());
    }

    #[test]
    fn test_load_upload_rejects_unsupported() {
        let mut session = Session::new(SizedCodec::new(0, 0));
        let result = session.load_upload(vec![1, 2, 3], "image/gif", Some("a.gif"));
        assert!(matches!(result, Err(ProcessError::UnsupportedInputFormat(_))));
        assert!(session.source().is_none());
        assert_eq!(session.status().severity(), Severity::Error);
    }

    #[test]
    fn test_load_upload_infers_type_from_name() {
        let mut session = Session::new(SizedCodec::new(0, 0));
        session.load_upload(vec![1], "", Some("doc.pdf")).unwrap();
        assert_eq!(session.source().unwrap().mime(), MimeType::Pdf);
        assert_eq!(session.status().code, StatusCode::PdfLoaded);
    }

    #[test]
    fn test_invalid_target_sets_status() {
        let mut session = session_with(SizedCodec::new(0, 0), SourceAsset::new(vec![0; 10], MimeType::Jpeg));
        let result = session.process(SizeTarget::kilobytes(-5.0));
        assert!(matches!(result, Err(ProcessError::InvalidTarget)));
        assert_eq!(session.status().message, "Enter a valid target size.");
    }

    #[test]
    fn test_png_scenario_reports_success_with_delta() {
        let mut codec = SizedCodec::new(0, 0);
        codec.lossless_len = 1_800_000;
        let mut session = session_with(codec, SourceAsset::new(vec![0; 2_000_000], MimeType::Png));

        let artifact = session.process(SizeTarget::kilobytes(500.0)).unwrap();
        assert_eq!(artifact.byte_len(), 1_800_000);
        assert_eq!(artifact.delta(), -200_000);
        assert_eq!(artifact.mime(), MimeType::Png);

        assert_eq!(session.codec().calls.get(), 1);
        assert_eq!(session.status().code, StatusCode::LosslessReencode);
        assert!(!session.status().is_error());
    }

    #[test]
    fn test_jpeg_target_too_small_returns_best_any() {
        let codec = SizedCodec::new(150_000, 100_000);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 3_000_000], MimeType::Jpeg));

        let artifact = session.process(SizeTarget::kilobytes(100.0)).unwrap();
        let len = artifact.byte_len();
        assert!(len >= 150_000 && len < 160_000, "got {}", len);

        assert_eq!(session.status().code, StatusCode::TargetTooSmall);
        assert_eq!(session.status().severity(), Severity::Warning);
        assert_eq!(session.codec().calls.get(), 10);
    }

    #[test]
    fn test_compress_within_target() {
        let codec = SizedCodec::new(10_000, 400_000);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 1_000_000], MimeType::Jpeg));

        let artifact = session.process(SizeTarget::kilobytes(200.0)).unwrap();
        assert!(artifact.byte_len() <= 204_800);
        assert_eq!(artifact.extension(), "jpg");
        assert_eq!(session.status().code, StatusCode::Compressed);
    }

    #[test]
    fn test_compress_target_above_size_passes_through() {
        let bytes: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        let asset = SourceAsset::new(bytes.clone(), MimeType::Jpeg).with_file_name("a.jpeg");
        let mut session = session_with(SizedCodec::new(0, 0), asset);

        let artifact = session.process(SizeTarget::megabytes(1.0)).unwrap();
        assert_eq!(artifact.bytes(), bytes.as_slice());
        assert_eq!(artifact.extension(), "jpeg");
        assert_eq!(artifact.delta(), 0);
        assert_eq!(session.codec().calls.get(), 0);
        assert_eq!(session.status().code, StatusCode::KeptOriginalSize);
    }

    #[test]
    fn test_compress_target_above_size_reencodes_new_format() {
        let codec = SizedCodec::new(500, 1_000);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 5_000], MimeType::Png));
        session.set_output_format(OutputFormat::Jpeg);

        let artifact = session.process(SizeTarget::megabytes(1.0)).unwrap();
        assert_eq!(artifact.mime(), MimeType::Jpeg);
        assert_eq!(artifact.byte_len(), 500 + 980);
        let qualities = session.codec().qualities.borrow();
        assert_eq!(qualities.as_slice(), &[0.98f32]);
    }

    #[test]
    fn test_compress_decode_failure_keeps_original() {
        let mut codec = SizedCodec::new(0, 1_000);
        codec.fail_decode = true;
        let mut session = session_with(codec, SourceAsset::new(vec![0; 5_000], MimeType::Jpeg));

        let artifact = session.process(SizeTarget::kilobytes(1.0)).unwrap();
        assert_eq!(artifact.byte_len(), 5_000);
        assert_eq!(session.status().code, StatusCode::KeptOriginalSize);
    }

    #[test]
    fn test_compress_pdf_rejected() {
        let mut session = session_with(SizedCodec::new(0, 0), SourceAsset::new(vec![0; 10], MimeType::Pdf));
        let result = session.process(SizeTarget::kilobytes(1.0));
        assert!(matches!(
            result,
            Err(ProcessError::UnsupportedConversion(Conversion::PdfCompression))
        ));
        assert!(session.status().message.contains("Enlarge Size"));
    }

    #[test]
    fn test_pdf_to_image_rejected_in_any_mode() {
        for mode in [Mode::Compress, Mode::Enlarge] {
            let mut session =
                session_with(SizedCodec::new(0, 0), SourceAsset::new(vec![0; 10], MimeType::Pdf));
            session.set_mode(mode);
            session.set_output_format(OutputFormat::Png);
            let result = session.process(SizeTarget::kilobytes(1.0));
            assert!(matches!(
                result,
                Err(ProcessError::UnsupportedConversion(Conversion::PdfToImage))
            ));
        }
    }

    #[test]
    fn test_compress_to_pdf_output() {
        let codec = SizedCodec::new(1_000, 50_000);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 100_000], MimeType::Jpeg));
        session.set_output_format(OutputFormat::Pdf);

        let artifact = session.process(SizeTarget::kilobytes(20.0)).unwrap();
        assert_eq!(artifact.mime(), MimeType::Pdf);
        assert_eq!(artifact.extension(), "pdf");
        assert!(artifact.bytes().starts_with(b"%PDF-1.4"));
        assert!(artifact.byte_len() <= 20 * 1024);
    }

    #[test]
    fn test_enlarge_pads_to_exact_size() {
        let source: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let mut session = session_with(
            SizedCodec::new(0, 0),
            SourceAsset::new(source.clone(), MimeType::Jpeg),
        );
        session.set_mode(Mode::Enlarge);

        let artifact = session.process(SizeTarget::megabytes(1.0)).unwrap();
        assert_eq!(artifact.byte_len(), 1_048_576);
        assert_eq!(artifact.delta(), 1_048_576 - 50_000);
        assert_eq!(&artifact.bytes()[..50_000], source.as_slice());
        assert_eq!(&artifact.bytes()[50_000..50_000 + PADDING_MARKER.len()], PADDING_MARKER);
        assert_eq!(session.codec().calls.get(), 0);
        assert_eq!(session.status().code, StatusCode::Enlarged);
    }

    #[test]
    fn test_enlarge_with_format_change_pads_reencode() {
        let codec = SizedCodec::new(30_000, 0);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 40_000], MimeType::Png));
        session.set_mode(Mode::Enlarge);
        session.set_output_format(OutputFormat::Jpeg);

        let artifact = session.process(SizeTarget::kilobytes(100.0)).unwrap();
        assert_eq!(artifact.byte_len(), 102_400);
        assert_eq!(artifact.mime(), MimeType::Jpeg);
        assert!(artifact.bytes()[..30_000].iter().all(|b| *b == 0xAB));
        assert_eq!(session.codec().qualities.borrow().as_slice(), &[0.98f32]);
    }

    #[test]
    fn test_enlarge_target_not_larger() {
        let mut session = session_with(
            SizedCodec::new(0, 0),
            SourceAsset::new(vec![0; 40_000], MimeType::Jpeg),
        );
        session.set_mode(Mode::Enlarge);

        let artifact = session.process(SizeTarget::kilobytes(10.0)).unwrap();
        assert_eq!(artifact.byte_len(), 40_000);
        assert_eq!(artifact.delta(), 0);
        assert_eq!(session.status().code, StatusCode::TargetNotLarger);
    }

    #[test]
    fn test_enlarge_pdf_uses_original_bytes() {
        let pdf = b"%PDF-1.4\n%%EOF".to_vec();
        let asset = SourceAsset::new(pdf.clone(), MimeType::Pdf).with_file_name("scan.pdf");
        let mut session = session_with(SizedCodec::new(0, 0), asset);
        session.set_mode(Mode::Enlarge);

        let artifact = session.process(SizeTarget::kilobytes(2.0)).unwrap();
        assert_eq!(artifact.byte_len(), 2048);
        assert_eq!(&artifact.bytes()[..pdf.len()], pdf.as_slice());
        assert_eq!(artifact.mime(), MimeType::Pdf);
        assert_eq!(artifact.extension(), "pdf");
        assert_eq!(session.codec().calls.get(), 0);
    }

    #[test]
    fn test_enlarge_beyond_memory_fails_cleanly() {
        let mut session = session_with(
            SizedCodec::new(0, 0),
            SourceAsset::new(vec![0xFF; 100], MimeType::Jpeg),
        );
        session.set_mode(Mode::Enlarge);
        session.process(SizeTarget::kilobytes(1.0)).unwrap();

        for megabytes in [1e12, 1e13] {
            let result = session.process(SizeTarget::megabytes(megabytes));
            assert!(
                matches!(result, Err(ProcessError::TargetTooLarge(_))),
                "unexpected {:?}",
                result
            );
            assert_eq!(session.status().code, StatusCode::Failed);
            assert!(session.status().message.contains("too large"));
            assert!(session.output().is_none());
        }
    }

    #[test]
    fn test_fail_sets_status_and_drops_output() {
        let mut session = session_with(
            SizedCodec::new(0, 0),
            SourceAsset::new(vec![0; 10], MimeType::Jpeg),
        );
        session.set_mode(Mode::Enlarge);
        session.process(SizeTarget::kilobytes(1.0)).unwrap();

        let err: ProcessError = "GB".parse::<crate::types::SizeUnit>().unwrap_err();
        session.fail(&err);
        assert_eq!(session.status().code, StatusCode::Failed);
        assert_eq!(session.status().message, "Unknown size unit: GB");
        assert!(session.output().is_none());
        assert!(session.source().is_some());
    }

    #[test]
    fn test_compress_real_webp_shrinks() {
        let mut pixels = Vec::with_capacity(96 * 96 * 3);
        for i in 0..96 * 96 * 3 {
            pixels.push(((i * 7919) % 256) as u8);
        }
        let image = DecodedImage::new(96, 96, pixels);
        let webp = ImageCodec.encode(&image, MimeType::Webp, 0.98).unwrap();

        let mut session = Session::new(ImageCodec);
        session.load(SourceAsset::new(webp.clone(), MimeType::Webp));
        let half_kb = webp.len() as f64 / 2.0 / 1024.0;
        let artifact = session.process(SizeTarget::kilobytes(half_kb)).unwrap();
        assert!(artifact.byte_len() < webp.len());
        assert_ne!(session.status().code, StatusCode::KeptOriginalSize);
    }

    #[test]
    fn test_enlarge_uses_configured_marker() {
        let config = ProcessConfig {
            padding_marker: "PAD".to_string(),
            ..ProcessConfig::default()
        };
        let mut session = Session::with_config(SizedCodec::new(10, 0), config).unwrap();
        session.load(SourceAsset::new(vec![0; 10], MimeType::Jpeg));
        session.set_mode(Mode::Enlarge);

        let artifact = session.process(SizeTarget::kilobytes(1.0)).unwrap();
        assert_eq!(&artifact.bytes()[10..13], b"PAD");
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let mut config = ProcessConfig::default();
        config.search.iterations = 0;
        assert!(Session::with_config(SizedCodec::new(0, 0), config).is_err());
    }

    #[test]
    fn test_transitions_release_output() {
        let codec = SizedCodec::new(50_000, 0);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 40_000], MimeType::Jpeg));
        session.set_mode(Mode::Enlarge);
        session.process(SizeTarget::megabytes(1.0)).unwrap();
        assert!(session.output().is_some());

        session.set_mode(Mode::Compress);
        assert!(session.output().is_none());
        assert_eq!(session.status().code, StatusCode::ModeChanged);

        session.process(SizeTarget::kilobytes(10.0)).unwrap();
        session.set_output_format(OutputFormat::Webp);
        assert!(session.output().is_none());
        assert_eq!(session.status().code, StatusCode::FormatChanged);

        session.process(SizeTarget::kilobytes(10.0)).unwrap();
        session.load(SourceAsset::new(vec![1; 5], MimeType::Png));
        assert!(session.output().is_none());
    }

    #[test]
    fn test_failed_run_drops_previous_output() {
        let codec = SizedCodec::new(50_000, 0);
        let mut session = session_with(codec, SourceAsset::new(vec![0; 40_000], MimeType::Jpeg));
        session.process(SizeTarget::kilobytes(10.0)).unwrap();
        assert!(session.output().is_some());

        assert!(session.process(SizeTarget::kilobytes(f64::NAN)).is_err());
        assert!(session.output().is_none());
    }

    #[test]
    fn test_enlarge_real_jpeg_stays_decodable() {
        let mut pixels = Vec::with_capacity(120 * 80 * 3);
        for i in 0..120 * 80 * 3 {
            pixels.push(((i * 31) % 256) as u8);
        }
        let image = DecodedImage::new(120, 80, pixels);
        let jpeg = ImageCodec.encode(&image, MimeType::Jpeg, 0.9).unwrap();

        let mut session = Session::new(ImageCodec);
        session.load(SourceAsset::new(jpeg.clone(), MimeType::Jpeg));
        session.set_mode(Mode::Enlarge);
        let artifact = session.process(SizeTarget::megabytes(1.0)).unwrap();
        assert_eq!(artifact.byte_len(), 1_048_576);
        assert_eq!(&artifact.bytes()[..jpeg.len()], jpeg.as_slice());

        let decoded = ImageCodec.decode(artifact.bytes(), MimeType::Jpeg).unwrap();
        assert_eq!((decoded.width, decoded.height), (120, 80));
    }
}
