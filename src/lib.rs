//!
//! `Tl-Signature` request signing
//!
//! Produces and verifies detached JSON Web Signatures (ES512, P-521/SHA-512) over a canonical
//! representation of an HTTP request's method, path, a chosen subset of headers and body.
//!
//! ```no_run
//! # fn run(private_key_pem: &str, public_key_pem: &str) -> tl_signature::Result<()> {
//! let body = br#"{"currency":"GBP","max_amount_in_minor":5000000}"#;
//!
//! let tl_signature = tl_signature::sign_with_pem("45fc75cf-5649-4134-84b3-192c2c78e990", private_key_pem)?
//!     .method("POST")
//!     .path("/merchant_accounts/a61acaef-ee05-4077-92f3-25543a11bd8d/sweeping")
//!     .header("Idempotency-Key", "idemp-2076717c-9005-4811-a321-9e0787fa0382")
//!     .body(body)
//!     .sign()?;
//!
//! tl_signature::verify_with_pem(public_key_pem)?
//!     .method("POST")
//!     .path("/merchant_accounts/a61acaef-ee05-4077-92f3-25543a11bd8d/sweeping")
//!     .header("idempotency-key", "idemp-2076717c-9005-4811-a321-9e0787fa0382")
//!     .body(body)
//!     .require_header("Idempotency-Key")
//!     .verify(&tl_signature)?;
//! # Ok(())
//! # }
//! ```
//!

#![forbid(rust_2018_idioms, unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub use crate::{
    crypto::{PrivateKey, PublicKey, SigningKey},
    error::Error,
    headers::HeaderSet,
    jws::{JwsHeader, extract_jku, extract_jws_header, extract_kid},
    jwks::{Jwk, Jwks},
    sign::{AsyncSigner, CustomSigner, Signer},
    verify::{HEADERS_HEADER, VERSION_HEADER, Verifier},
};

pub mod base64url;
pub mod crypto;
#[cfg(feature = "easy")]
pub mod easy;
mod error;
mod headers;
pub mod jws;
mod jwks;
pub mod payload;
mod sign;
mod verify;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias defaulting to this crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Name of the HTTP header carrying the detached JWS
pub const SIGNATURE_HEADER: &str = "Tl-Signature";

/// Start signing a request with a P-521 private key in PEM form (PKCS#8 or SEC1)
#[inline]
pub fn sign_with_pem<'a>(
    kid: &'a str,
    private_key_pem: impl AsRef<[u8]>,
) -> Result<Signer<'a, PrivateKey>> {
    let key = PrivateKey::from_pem(private_key_pem)?;
    Ok(Signer::new(kid, key))
}

/// Start signing a request with an already imported key or any other [`SigningKey`]
#[inline]
pub fn sign_with_key<K>(kid: &str, key: K) -> Signer<'_, K>
where
    K: SigningKey,
{
    Signer::new(kid, key)
}

/// Start signing a request whose signature is produced by a closure
///
/// The closure receives the JWS signing input and returns the base64url encoded ES512 signature.
/// Useful when the private key lives in an external KMS/HSM.
#[inline]
pub fn sign_with<F, E>(kid: &str, sign_fn: F) -> Signer<'_, CustomSigner<F>>
where
    F: Fn(&str) -> Result<String, E>,
    E: Into<BoxError>,
{
    Signer::new(kid, CustomSigner::new(sign_fn))
}

/// Start signing a request whose signature is produced asynchronously
///
/// See [`Signer::sign_async`]
#[inline]
pub fn sign_with_async<F>(kid: &str, sign_fn: F) -> Signer<'_, AsyncSigner<F>> {
    Signer::new(kid, AsyncSigner::new(sign_fn))
}

/// Start verifying a request with a P-521 public key in SPKI PEM form
#[inline]
pub fn verify_with_pem<'a>(public_key_pem: impl AsRef<[u8]>) -> Result<Verifier<'a>> {
    let key = PublicKey::from_pem(public_key_pem)?;
    Ok(Verifier::from_key(key))
}

/// Start verifying a request with an already imported public key
#[inline]
#[must_use]
pub fn verify_with_key<'a>(public_key: PublicKey) -> Verifier<'a> {
    Verifier::from_key(public_key)
}

/// Start verifying a request against a JWKS document
///
/// The verification key is selected by the `kid` of the token once it is known.
/// Fetching the document (and allow-listing its URL) is up to the caller.
#[inline]
pub fn verify_with_jwks<'a>(jwks_json: impl AsRef<[u8]>) -> Result<Verifier<'a>> {
    let jwks = Jwks::from_slice(jwks_json.as_ref())?;
    Ok(Verifier::from_jwks(jwks))
}
