//!
//! Import P-521 keys from JSON Web Keys
//!

use super::{COORDINATE_LEN, PrivateKey, PublicKey};
use crate::{Error, Result, base64url};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON Web Key
///
/// Only EC P-521 keys can be imported, but any key type deserialises so a JWKS mixing key types
/// can still be searched.
#[derive(Clone, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Jwk {
    /// Key type
    pub kty: String,

    /// Key ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Curve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    /// X coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Y coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Private scalar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// Intended algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Intended use
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

impl Jwk {
    /// Whether this is an EC key on the P-521 curve
    #[must_use]
    pub fn is_p521(&self) -> bool {
        self.kty == "EC" && self.crv.as_deref() == Some("P-521")
    }
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("kid", &self.kid)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .field("alg", &self.alg)
            .field("key_use", &self.key_use)
            .finish()
    }
}

/// Decode a base64url field element and left-pad it with zeroes to the P-521 field size
///
/// Encoders commonly strip leading zero bytes, which makes the decoded value shorter than the
/// curve's field size.
pub fn decode_field_element(name: &str, encoded: &str) -> Result<[u8; COORDINATE_LEN]> {
    let bytes = base64url::decode(encoded)
        .map_err(|err| Error::InvalidKey(format!("JWK parameter \"{name}\": {err}")))?;

    if bytes.len() > COORDINATE_LEN {
        return Err(Error::InvalidKey(format!(
            "JWK parameter \"{name}\" is {} bytes long (expected at most {COORDINATE_LEN})",
            bytes.len()
        )));
    }

    let mut padded = [0; COORDINATE_LEN];
    padded[COORDINATE_LEN - bytes.len()..].copy_from_slice(&bytes);
    Ok(padded)
}

fn ensure_p521(jwk: &Jwk) -> Result<()> {
    if jwk.is_p521() {
        Ok(())
    } else {
        Err(Error::InvalidKey(format!(
            "expected an EC P-521 key, got kty \"{}\" crv \"{}\"",
            jwk.kty,
            jwk.crv.as_deref().unwrap_or_default()
        )))
    }
}

fn required<'a>(name: &str, value: Option<&'a String>) -> Result<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidKey(format!("JWK is missing the \"{name}\" parameter")))
}

/// Import the public key described by the `x`/`y` coordinates
pub fn public_key(jwk: &Jwk) -> Result<PublicKey> {
    ensure_p521(jwk)?;

    let x = decode_field_element("x", required("x", jwk.x.as_ref())?)?;
    let y = decode_field_element("y", required("y", jwk.y.as_ref())?)?;

    let mut sec1 = Vec::with_capacity(1 + 2 * COORDINATE_LEN);
    sec1.push(0x04);
    sec1.extend_from_slice(&x);
    sec1.extend_from_slice(&y);

    PublicKey::from_sec1_bytes(&sec1)
}

/// Import the private key described by the `d` parameter
///
/// If the JWK also carries coordinates, they have to match the key derived from `d`.
pub fn private_key(jwk: &Jwk) -> Result<PrivateKey> {
    ensure_p521(jwk)?;

    let d = decode_field_element("d", required("d", jwk.d.as_ref())?)?;
    let signing_key = p521::ecdsa::SigningKey::from_slice(&d)
        .map_err(|_| Error::InvalidKey("JWK parameter \"d\" isn't a valid scalar".into()))?;
    let private_key = PrivateKey::from(signing_key);

    if jwk.x.is_some() || jwk.y.is_some() {
        let declared = public_key(jwk)?;
        if declared != private_key.public_key() {
            return Err(Error::InvalidKey(
                "JWK coordinates don't match the private key".into(),
            ));
        }
    }

    Ok(private_key)
}
