use crate::BoxError;
use miette::Diagnostic;
use thiserror::Error;

/// Signing/verification error
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
    /// Key material couldn't be imported (malformed PEM/JWK, unsupported curve or key type)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Builder was fed an unusable value (path without a leading `/`, duplicate header, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Token isn't a well-formed detached JWS
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// JWS header declares an algorithm other than ES512
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Neither the JWS header nor the request declare signing scheme version 2
    #[error("Unsupported signature version: {0}")]
    UnsupportedVersion(String),

    /// JWS header has no `kid` to select a key from the JWKS with
    #[error("Missing kid in JWS header")]
    MissingKid,

    /// A header the caller requires to be signed isn't part of `tl_headers`
    #[error("Missing required header in signature: {0}")]
    MissingRequiredHeader(String),

    /// A header declared in `tl_headers` isn't present on the request
    #[error("Missing signed header on request: {0}")]
    MissingSignedHeader(String),

    /// No key in the JWKS matches the token's `kid`
    #[error("No key with kid \"{0}\" found in JWKS")]
    NoMatchingKey(String),

    /// The JWKS entry matching the `kid` isn't an EC P-521 key
    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    /// Cryptographic verification failed
    #[error("Invalid signature")]
    InvalidSignature,

    /// External signing strategy failed
    #[error("Signing failed")]
    Signing(#[source] BoxError),

    /// Request carries no `Tl-Signature` header
    #[cfg(feature = "easy")]
    #[error("Missing Tl-Signature header")]
    MissingSignature,
}
