//! Opaque filename encoding for seaweed file ids.
//!
//! A file id (`volumeId,fileKey`) is never handed out as-is. Callers only see
//! the URL-safe base64 form, optionally suffixed with `.ext` as a content-type
//! hint. Handles issued this way end up in signed URLs, so the alphabet and
//! the padding are frozen: changing either orphans every handle ever issued.

use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

use crate::{SeaweedError, SeaweedResult};

/// Padded URL-safe base64. Non-zero trailing bits in the last symbol are
/// tolerated on decode, matching the filenames older clients accepted.
const FILENAME_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Encode a file id into its opaque filename.
pub fn encode(fid: &[u8]) -> String {
    FILENAME_ENGINE.encode(fid)
}

/// Decode an opaque filename back into the file id.
///
/// Everything from the first `.` onward is discarded before decoding. No
/// validation beyond base64 well-formedness happens here; a key that does not
/// exist surfaces later as a lookup miss.
pub fn decode(filename: &str) -> SeaweedResult<Vec<u8>> {
    let encoded = strip_extension(filename);
    Ok(FILENAME_ENGINE.decode(encoded)?)
}

/// Decode an opaque filename into a file id that can be placed in a URL path.
pub fn decode_fid(filename: &str) -> SeaweedResult<String> {
    let raw = decode(filename)?;
    String::from_utf8(raw).map_err(|e| SeaweedError::decode("file id is not valid utf-8", e))
}

/// The volume id is everything before the first comma of the file id.
pub fn volume_id(fid: &str) -> &str {
    fid.split(',').next().unwrap_or(fid)
}

fn strip_extension(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_encode_is_padded_url_safe() {
        assert_eq!(encode(b"3,abc"), "MyxhYmM=");
        // 0xfb 0xff encodes to '+/8=' in the standard alphabet
        assert_eq!(encode(&[0xfb, 0xff]), "-_8=");
    }

    #[test]
    fn test_decode_strips_extension() {
        let filename = format!("{}.tar.gz", encode(b"7,01637037d6"));
        assert_eq!(decode(&filename).unwrap(), b"7,01637037d6");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("not base64!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        let err = decode("+/8=").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_decode_tolerates_trailing_bits() {
        // "MyxhYmM=" with the unused low bits of the last symbol set
        assert_eq!(decode("MyxhYmN=").unwrap(), b"3,abc");
        assert_eq!(decode("MyxhYmN=.jpg").unwrap(), b"3,abc");
    }

    #[test]
    fn test_decode_rejects_missing_padding() {
        let err = decode("MyxhYmM").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_decode_fid_rejects_non_utf8() {
        let filename = encode(&[0xff, 0xfe, 0x2c]);
        let err = decode_fid(&filename).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_volume_id() {
        assert_eq!(volume_id("3,01637037d6"), "3");
        assert_eq!(volume_id("42"), "42");
        assert_eq!(volume_id(""), "");
    }

    proptest! {
        #[test]
        fn prop_round_trip(fid in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(decode(&encode(&fid)).unwrap(), fid);
        }

        #[test]
        fn prop_extension_ignored(
            fid in proptest::collection::vec(any::<u8>(), 0..64),
            ext in "[a-z0-9]{0,5}",
        ) {
            let filename = format!("{}.{}", encode(&fid), ext);
            prop_assert_eq!(decode(&filename).unwrap(), fid);
        }

        #[test]
        fn prop_decode_never_panics(input in ".*") {
            let _ = decode(&input);
        }
    }
}
