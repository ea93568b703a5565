//!
//! ES512 (ECDSA over P-521 with SHA-512) primitives and key import
//!

mod sign;
mod verify;

pub mod jwk;
pub mod parse;

pub use self::sign::{PrivateKey, SigningKey};
pub use self::verify::{PublicKey, verify};

/// Byte length of a P-521 field element (and of each JWK coordinate)
pub const COORDINATE_LEN: usize = 66;

/// Byte length of a raw (IEEE P1363, `r || s`) ES512 signature
pub const SIGNATURE_LEN: usize = 2 * COORDINATE_LEN;
