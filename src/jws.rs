//!
//! JWS header claims and the detached compact serialisation
//!

use crate::{Error, Result, base64url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only supported signature algorithm
pub const ALGORITHM: &str = "ES512";

/// The only supported signing scheme version
pub const VERSION: &str = "2";

/// Claims of the JWS header
///
/// Unknown keys are ignored when parsing. `alg` and `tl_version` are deserialised leniently so a
/// missing algorithm or a non-string version is rejected by the verifier with the matching error
/// instead of failing as a malformed token.
/// `tl_version` and `tl_headers` may be absent from tokens of older signers which transmit them as
/// `Tl-Signature-Version`/`Tl-Signature-Headers` request headers instead.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct JwsHeader {
    /// Signature algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Identifier of the signing key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Signing scheme version, the string `"2"` for current signers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tl_version: Option<Value>,

    /// Comma separated names of the signed headers, in payload order and casing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tl_headers: Option<String>,

    /// URL of the JWKS containing the verification key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jku: Option<String>,
}

impl JwsHeader {
    /// Header as produced by the signer
    pub(crate) fn new<'n, I>(kid: &str, header_names: I, jku: Option<&str>) -> Self
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut tl_headers = String::new();
        for item in itertools::intersperse(header_names, ",") {
            tl_headers.push_str(item);
        }

        Self {
            alg: Some(ALGORITHM.into()),
            kid: Some(kid.into()),
            tl_version: Some(Value::String(VERSION.into())),
            tl_headers: Some(tl_headers),
            jku: jku.map(Into::into),
        }
    }

    /// Base64url encoded JSON of the header, the first segment of the token
    pub(crate) fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)
            .map_err(|err| Error::InvalidArgument(format!("unserialisable JWS header: {err}")))?;

        Ok(base64url::encode(json))
    }

    fn decode(segment: &str) -> Result<Self> {
        let json = base64url::decode(segment)
            .map_err(|err| Error::MalformedSignature(format!("JWS header: {err}")))?;

        serde_json::from_slice(&json)
            .map_err(|err| Error::MalformedSignature(format!("JWS header: {err}")))
    }
}

/// Split a `tl_headers` value into its header names
///
/// Entries are trimmed, empty entries are dropped.
pub fn split_header_names(tl_headers: &str) -> impl Iterator<Item = &str> {
    tl_headers
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// A parsed `header..signature` token
#[derive(Clone, Debug)]
pub struct DetachedJws<'t> {
    /// First segment exactly as transmitted, part of the signing input
    pub encoded_header: &'t str,

    /// Decoded claims of the first segment
    pub header: JwsHeader,

    /// Raw signature bytes
    pub signature: Vec<u8>,
}

impl<'t> DetachedJws<'t> {
    /// Parse a detached compact JWS
    pub fn parse(token: &'t str) -> Result<Self> {
        let (encoded_header, encoded_signature) = split(token)?;
        let header = JwsHeader::decode(encoded_header)?;
        let signature = base64url::decode(encoded_signature)
            .map_err(|err| Error::MalformedSignature(format!("JWS signature: {err}")))?;

        Ok(Self {
            encoded_header,
            header,
            signature,
        })
    }

    /// JWS signing input for the given payload: `{header}.{base64url(payload)}`
    #[must_use]
    pub fn signing_input(&self, payload: &[u8]) -> String {
        signing_input(self.encoded_header, payload)
    }
}

/// JWS signing input: `{encoded_header}.{base64url(payload)}`
pub(crate) fn signing_input(encoded_header: &str, payload: &[u8]) -> String {
    let encoded_payload = base64url::encode(payload);

    let mut input = String::with_capacity(encoded_header.len() + encoded_payload.len() + 1);
    input.push_str(encoded_header);
    input.push('.');
    input.push_str(&encoded_payload);
    input
}

/// Assemble the detached compact form `{header}..{signature}`
pub(crate) fn serialise(encoded_header: &str, encoded_signature: &str) -> String {
    format!("{encoded_header}..{encoded_signature}")
}

/// Split a token into its header and signature segments, requiring an empty payload segment
fn split(token: &str) -> Result<(&str, &str)> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::MalformedSignature(
            "expected three dot-separated segments".into(),
        ));
    };

    if !payload.is_empty() {
        return Err(Error::MalformedSignature(
            "payload segment must be empty (detached)".into(),
        ));
    }

    if header.is_empty() {
        return Err(Error::MalformedSignature("empty header segment".into()));
    }

    Ok((header, signature))
}

/// Parse the JWS header of a token without verifying anything
///
/// The returned values are untrusted until the signature has been verified.
pub fn extract_jws_header(tl_signature: &str) -> Result<JwsHeader> {
    let (encoded_header, _signature) = split(tl_signature)?;
    JwsHeader::decode(encoded_header)
}

/// Read the `kid` of a token without verifying anything
///
/// The returned value is untrusted until the signature has been verified.
pub fn extract_kid(tl_signature: &str) -> Result<String> {
    extract_jws_header(tl_signature)?.kid.ok_or(Error::MissingKid)
}

/// Read the `jku` of a token without verifying anything
///
/// The returned URL is untrusted. Check it against an allow-list before fetching it.
pub fn extract_jku(tl_signature: &str) -> Result<Option<String>> {
    Ok(extract_jws_header(tl_signature)?.jku)
}
