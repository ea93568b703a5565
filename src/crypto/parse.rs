//!
//! Parse P-521 keys from their PEM forms
//!

use super::{PrivateKey, PublicKey};
use crate::{Error, Result};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_521_R_1};
use pkcs8::{
    Document, PrivateKeyInfo, SecretDocument, SubjectPublicKeyInfoRef, spki::AlgorithmIdentifierRef,
};
use std::{fmt::Display, str};

const PKCS8_PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const SEC1_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";

#[inline]
fn invalid_key(err: impl Display) -> Error {
    Error::InvalidKey(err.to_string())
}

/// Make sure the algorithm identifier denotes an EC key on the P-521 curve
fn ensure_p521(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<()> {
    if algorithm.oid != ID_EC_PUBLIC_KEY {
        return Err(Error::InvalidKey(format!(
            "unsupported key algorithm {}",
            algorithm.oid
        )));
    }

    let curve = algorithm.parameters_oid().map_err(invalid_key)?;
    if curve != SECP_521_R_1 {
        return Err(Error::InvalidKey(format!("unsupported curve {curve}")));
    }

    Ok(())
}

fn pem_str(pem: &[u8]) -> Result<&str> {
    str::from_utf8(pem).map_err(|_| Error::InvalidKey("PEM isn't valid UTF-8".into()))
}

/// Parse a public key from its SPKI PEM form
#[inline]
pub fn public_key(pem: &[u8]) -> Result<PublicKey> {
    let (_pem_tag, document) = Document::from_pem(pem_str(pem)?).map_err(invalid_key)?;
    let spki: SubjectPublicKeyInfoRef<'_> = document.decode_msg().map_err(invalid_key)?;
    ensure_p521(&spki.algorithm)?;

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| Error::InvalidKey("Malformed key".into()))?;

    PublicKey::from_sec1_bytes(raw_bytes)
}

/// Parse a private key from its PKCS#8 or SEC1 PEM form
///
/// The PEM label decides the format: `PRIVATE KEY` for PKCS#8, `EC PRIVATE KEY` for SEC1.
#[inline]
pub fn private_key(pem: &[u8]) -> Result<PrivateKey> {
    let (label, document) = SecretDocument::from_pem(pem_str(pem)?).map_err(invalid_key)?;

    let secret_key = match label {
        PKCS8_PRIVATE_KEY_LABEL => {
            let private_key_info: PrivateKeyInfo<'_> =
                document.decode_msg().map_err(invalid_key)?;
            ensure_p521(&private_key_info.algorithm)?;

            p521::SecretKey::from_sec1_der(private_key_info.private_key)
        }
        SEC1_PRIVATE_KEY_LABEL => p521::SecretKey::from_sec1_der(document.as_bytes()),
        other => {
            return Err(Error::InvalidKey(format!("unexpected PEM label \"{other}\"")));
        }
    }
    .map_err(invalid_key)?;

    let signing_key =
        p521::ecdsa::SigningKey::from_slice(&secret_key.to_bytes()).map_err(invalid_key)?;

    Ok(PrivateKey::from(signing_key))
}
