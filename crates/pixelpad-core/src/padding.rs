//! Size padding.
//!
//! JPEG, PNG, WEBP and PDF readers stop at their end marker, so bytes
//! appended after the original file do not change what is decoded.

use std::collections::TryReserveError;

/// Marker written at the start of the padding region.
pub const PADDING_MARKER: &[u8] = b"\nPixelPad metadata padding\n";

/// Grow `bytes` to exactly `target_bytes` with the default marker.
///
/// Returns the input untouched when it is already at least `target_bytes`
/// long; padding never truncates.
///
/// # Errors
///
/// Returns an error if the padded buffer cannot be allocated.
pub fn pad(bytes: Vec<u8>, target_bytes: usize) -> Result<Vec<u8>, TryReserveError> {
    pad_with_marker(bytes, target_bytes, PADDING_MARKER)
}

/// Grow `bytes` to exactly `target_bytes`.
///
/// The original bytes stay at offset 0, `marker` follows them (cut short if
/// the gap is smaller), and the rest is zero. The whole gap is reserved up
/// front, so an allocation failure leaves nothing half-written.
///
/// # Errors
///
/// Returns an error if the padded buffer cannot be allocated.
pub fn pad_with_marker(
    mut bytes: Vec<u8>,
    target_bytes: usize,
    marker: &[u8],
) -> Result<Vec<u8>, TryReserveError> {
    let original_len = bytes.len();
    if original_len >= target_bytes {
        return Ok(bytes);
    }

    let gap = target_bytes - original_len;
    let marker = &marker[..marker.len().min(gap)];

    bytes.try_reserve_exact(gap)?;
    bytes.extend_from_slice(marker);
    bytes.resize(target_bytes, 0);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_exact_length_and_prefix() {
        let original: Vec<u8> = (0..50_000u32).map(|i| (i % 256) as u8).collect();
        let padded = pad(original.clone(), 1_048_576).unwrap();

        assert_eq!(padded.len(), 1_048_576);
        assert_eq!(&padded[..original.len()], original.as_slice());
        assert_eq!(
            &padded[original.len()..original.len() + PADDING_MARKER.len()],
            PADDING_MARKER
        );
        assert!(padded[original.len() + PADDING_MARKER.len()..]
            .iter()
            .all(|b| *b == 0));
    }

    #[test]
    fn test_pad_same_length_is_noop() {
        let original = vec![7u8; 100];
        assert_eq!(pad(original.clone(), 100).unwrap(), original);
    }

    #[test]
    fn test_pad_never_truncates() {
        let original = vec![7u8; 100];
        assert_eq!(pad(original.clone(), 10).unwrap(), original);
        assert_eq!(pad(original.clone(), 0).unwrap(), original);
    }

    #[test]
    fn test_pad_truncates_marker_to_gap() {
        let padded = pad(vec![1, 2, 3], 8).unwrap();
        assert_eq!(padded.len(), 8);
        assert_eq!(&padded[..3], &[1, 2, 3]);
        assert_eq!(&padded[3..], &PADDING_MARKER[..5]);
    }

    #[test]
    fn test_pad_empty_input() {
        let padded = pad(Vec::new(), 4).unwrap();
        assert_eq!(padded, PADDING_MARKER[..4].to_vec());
    }

    #[test]
    fn test_custom_marker() {
        let padded = pad_with_marker(vec![9], 6, b"MARK").unwrap();
        assert_eq!(padded, vec![9, b'M', b'A', b'R', b'K', 0]);

        let padded = pad_with_marker(vec![9], 3, b"").unwrap();
        assert_eq!(padded, vec![9, 0, 0]);
    }

    #[test]
    fn test_unallocatable_target_is_an_error() {
        assert!(pad(vec![1, 2, 3], usize::MAX).is_err());
    }
}
