use super::{SIGNATURE_LEN, jwk::Jwk};
use crate::{Error, Result, base64url};
use p521::ecdsa::{Signature, VerifyingKey, signature::Verifier as _};
use std::fmt;

/// P-521 public key
#[derive(Clone)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Import a public key from its SPKI PEM form (`PUBLIC KEY`)
    #[inline]
    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<Self> {
        super::parse::public_key(pem.as_ref())
    }

    /// Import a public key from an EC P-521 JWK
    #[inline]
    pub fn from_jwk(jwk: &Jwk) -> Result<Self> {
        super::jwk::public_key(jwk)
    }

    /// Import a public key from its SEC1 encoded point
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidKey("not a valid P-521 point".into()))
    }

    /// Export the key as a public JWK, ready to be published in a JWKS
    #[must_use]
    pub fn to_jwk(&self, kid: &str) -> Jwk {
        let point = self.0.to_encoded_point(false);

        Jwk {
            kty: "EC".into(),
            kid: Some(kid.into()),
            crv: Some("P-521".into()),
            x: point.x().map(base64url::encode),
            y: point.y().map(base64url::encode),
            d: None,
            alg: Some(crate::jws::ALGORITHM.into()),
            key_use: Some("sig".into()),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey")
            .field(&base64url::encode(self.0.to_encoded_point(false)))
            .finish()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_encoded_point(false) == other.0.to_encoded_point(false)
    }
}

impl Eq for PublicKey {}

impl From<VerifyingKey> for PublicKey {
    #[inline]
    fn from(value: VerifyingKey) -> Self {
        Self(value)
    }
}

/// Verify that the message corresponds with the raw `r || s` signature using the provided key
///
/// SHA-512 hashing of the message happens as part of the ES512 verification.
#[inline]
pub fn verify(msg: &[u8], signature: &[u8], key: &PublicKey) -> Result<()> {
    if signature.len() != SIGNATURE_LEN {
        return Err(Error::InvalidSignature);
    }

    let signature = Signature::from_slice(signature).map_err(|_| Error::InvalidSignature)?;
    key.0
        .verify(msg, &signature)
        .map_err(|_| Error::InvalidSignature)
}
