use super::{PublicKey, jwk::Jwk};
use crate::{BoxError, Result, base64url};
use p521::ecdsa::{Signature, signature::Signer as _};
use std::fmt;

/// Signing key definition
///
/// Implementors receive the JWS signing input (`{header}.{payload}`, both base64url encoded) and
/// return the base64url encoded ES512 signature in its raw `r || s` form.
pub trait SigningKey {
    /// Sign the JWS signing input
    fn sign(&self, signing_input: &str) -> Result<String, BoxError>;
}

impl<K> SigningKey for &K
where
    K: SigningKey + ?Sized,
{
    #[inline]
    fn sign(&self, signing_input: &str) -> Result<String, BoxError> {
        (**self).sign(signing_input)
    }
}

/// P-521 private key
#[derive(Clone)]
pub struct PrivateKey(p521::ecdsa::SigningKey);

impl PrivateKey {
    /// Import a private key from its PEM form (PKCS#8 `PRIVATE KEY` or SEC1 `EC PRIVATE KEY`)
    #[inline]
    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<Self> {
        super::parse::private_key(pem.as_ref())
    }

    /// Import a private key from a JWK carrying the `d` parameter
    #[inline]
    pub fn from_jwk(jwk: &Jwk) -> Result<Self> {
        super::jwk::private_key(jwk)
    }

    /// Derive the matching public key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(p521::ecdsa::VerifyingKey::from(&self.0))
    }

    /// Sign a message, returning the raw `r || s` signature
    #[must_use]
    pub fn sign_bytes(&self, msg: &[u8]) -> Vec<u8> {
        let signature: Signature = self.0.sign(msg);
        signature.to_bytes().to_vec()
    }
}

impl From<p521::ecdsa::SigningKey> for PrivateKey {
    #[inline]
    fn from(value: p521::ecdsa::SigningKey) -> Self {
        Self(value)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

impl SigningKey for PrivateKey {
    #[inline]
    fn sign(&self, signing_input: &str) -> Result<String, BoxError> {
        Ok(base64url::encode(self.sign_bytes(signing_input.as_bytes())))
    }
}
