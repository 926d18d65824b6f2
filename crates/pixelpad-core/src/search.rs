//! Size-target search.
//!
//! Binary-searches the encoder quality so the output fits a byte budget.
//! Encodes run strictly one after another; each candidate is dropped as soon
//! as a better one replaces it.

use crate::codec::Codec;
use crate::config::SearchConfig;
use crate::convert::encode_as;
use crate::types::{EncodedCandidate, MimeType, SourceAsset};

/// How the search ended.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Largest candidate that fits the target.
    WithinTarget(EncodedCandidate),
    /// Nothing fit; the smallest candidate seen.
    Smallest(EncodedCandidate),
    /// Lossless output: encoded once at full fidelity, size not targeted.
    Lossless(EncodedCandidate),
    /// No candidate could be produced; use the source unchanged.
    Original,
}

impl SearchOutcome {
    pub fn candidate(&self) -> Option<&EncodedCandidate> {
        match self {
            SearchOutcome::WithinTarget(c)
            | SearchOutcome::Smallest(c)
            | SearchOutcome::Lossless(c) => Some(c),
            SearchOutcome::Original => None,
        }
    }

    pub fn into_candidate(self) -> Option<EncodedCandidate> {
        match self {
            SearchOutcome::WithinTarget(c)
            | SearchOutcome::Smallest(c)
            | SearchOutcome::Lossless(c) => Some(c),
            SearchOutcome::Original => None,
        }
    }
}

/// Find the encoding of `asset` as `mime` that best fits `target_bytes`.
///
/// Codec failures never escape: a decode failure yields
/// [`SearchOutcome::Original`] and an encode failure stops the loop with
/// whatever candidates were already found.
pub fn search_quality<C: Codec + ?Sized>(
    codec: &C,
    asset: &SourceAsset,
    target_bytes: u64,
    mime: MimeType,
    config: &SearchConfig,
) -> SearchOutcome {
    let image = match codec.decode(asset.bytes(), asset.mime()) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("cannot decode {} source, keeping original: {}", asset.mime(), e);
            return SearchOutcome::Original;
        }
    };

    if !mime.is_lossy() {
        return match encode_as(codec, &image, mime, 1.0) {
            Ok(bytes) => SearchOutcome::Lossless(EncodedCandidate::new(bytes, mime, 1.0)),
            Err(e) => {
                log::warn!("lossless {} encode failed, keeping original: {}", mime, e);
                SearchOutcome::Original
            }
        };
    }

    let mut low = config.min_quality;
    let mut high = config.max_quality;
    // Once something fits, undersized candidates win and best_any is unused.
    let mut best_under: Option<EncodedCandidate> = None;
    let mut best_any: Option<EncodedCandidate> = None;

    for iteration in 0..config.iterations {
        let quality = (low + high) / 2.0;
        let bytes = match encode_as(codec, &image, mime, quality) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{} encode at quality {:.3} failed: {}", mime, quality, e);
                break;
            }
        };
        let candidate = EncodedCandidate::new(bytes, mime, quality);
        let size = candidate.byte_len() as u64;
        log::debug!(
            "search iteration {}: quality {:.3} -> {} bytes (target {})",
            iteration,
            quality,
            size,
            target_bytes
        );

        if size <= target_bytes {
            low = quality;
            best_any = None;
            if best_under
                .as_ref()
                .map_or(true, |best| candidate.byte_len() > best.byte_len())
            {
                best_under = Some(candidate);
            }
        } else {
            high = quality;
            if best_under.is_none()
                && best_any
                    .as_ref()
                    .map_or(true, |best| candidate.byte_len() < best.byte_len())
            {
                best_any = Some(candidate);
            }
        }
    }

    let outcome = match (best_under, best_any) {
        (Some(c), _) => SearchOutcome::WithinTarget(c),
        (None, Some(c)) => SearchOutcome::Smallest(c),
        (None, None) => SearchOutcome::Original,
    };
    if let Some(c) = outcome.candidate() {
        log::debug!(
            "search settled on {} quality {:.3} ({} bytes)",
            mime,
            c.quality(),
            c.byte_len()
        );
    }
    outcome
}
