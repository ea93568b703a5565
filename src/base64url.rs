//!
//! Unpadded, URL-safe Base64 as used by JOSE
//!

use std::borrow::Cow;
use thiserror::Error;

/// Input isn't valid base64url (or standard base64)
#[derive(Debug, Error)]
#[error("Invalid base64url input")]
pub struct DecodeError;

impl From<base64_simd::Error> for DecodeError {
    #[inline]
    fn from(_: base64_simd::Error) -> Self {
        Self
    }
}

/// Encode bytes as unpadded base64url
#[inline]
#[must_use]
pub fn encode(input: impl AsRef<[u8]>) -> String {
    base64_simd::URL_SAFE_NO_PAD.encode_to_string(input)
}

/// Decode base64url input
///
/// For compatibility with external input this also accepts the standard alphabet (`+`, `/`)
/// and explicit `=` padding. A trailing group of a single character is rejected.
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();

    let unpadded = trim_padding(input)?;
    let normalised = if unpadded.iter().any(|byte| matches!(byte, b'+' | b'/')) {
        Cow::Owned(
            unpadded
                .iter()
                .map(|byte| match byte {
                    b'+' => b'-',
                    b'/' => b'_',
                    other => *other,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(unpadded)
    };

    Ok(base64_simd::URL_SAFE_NO_PAD.decode_to_vec(normalised)?)
}

/// Strip explicit padding, making sure there is no more of it than a base64 group allows
fn trim_padding(input: &[u8]) -> Result<&[u8], DecodeError> {
    let data_len = input.iter().rposition(|byte| *byte != b'=').map_or(0, |pos| pos + 1);
    let padding = input.len() - data_len;

    if padding > 2 || (padding > 0 && input.len() % 4 != 0) {
        return Err(DecodeError);
    }

    Ok(&input[..data_len])
}
