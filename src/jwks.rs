pub use crate::crypto::jwk::Jwk;

use crate::{Error, PublicKey, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// JSON Web Key Set
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Jwks {
    /// Keys of the set
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// Parse a JWKS document
    pub fn from_slice(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(|err| Error::InvalidKey(format!("JWKS: {err}")))
    }

    /// Find the key with the given `kid`
    pub fn find(&self, kid: &str) -> Result<&Jwk> {
        self.keys
            .iter()
            .find(|jwk| jwk.kid.as_deref() == Some(kid))
            .ok_or_else(|| {
                warn!(%kid, keys = self.keys.len(), "no key with matching kid in JWKS");
                Error::NoMatchingKey(kid.to_string())
            })
    }

    /// Find the key with the given `kid` and import it as a P-521 public key
    pub fn resolve(&self, kid: &str) -> Result<PublicKey> {
        let jwk = self.find(kid)?;
        if !jwk.is_p521() {
            return Err(Error::UnsupportedKey(format!(
                "key \"{kid}\" has kty \"{}\" crv \"{}\"",
                jwk.kty,
                jwk.crv.as_deref().unwrap_or_default()
            )));
        }

        PublicKey::from_jwk(jwk)
    }
}
