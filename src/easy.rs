//!
//! Sign and verify `http` requests
//!
//! Takes the method, path, headers and body straight from an [`http::Request`]
//!

use crate::{Error, Result, SigningKey, Verifier, sign::Signer};
use http::{HeaderName, HeaderValue, Request};
use tracing::instrument;

static TL_SIGNATURE: HeaderName = HeaderName::from_static("tl-signature");

/// Sign a request and insert the resulting `Tl-Signature` header
///
/// The headers listed in `header_names` are signed in that order and have to be present on the
/// request. Their names are put into the signature with the casing given here.
#[instrument(skip_all)]
pub fn sign<B, K>(
    mut req: Request<B>,
    kid: &str,
    key: K,
    header_names: &[&str],
) -> Result<Request<B>>
where
    B: AsRef<[u8]>,
    K: SigningKey,
{
    let tl_signature = {
        let mut signer = Signer::new(kid, key)
            .method(req.method().as_str())
            .path(req.uri().path())
            .body(req.body());

        for &name in header_names {
            let value = req.headers().get(name).ok_or_else(|| {
                Error::InvalidArgument(format!("header \"{name}\" isn't present on the request"))
            })?;
            signer = signer.header(name, value.as_bytes());
        }

        signer.sign()?
    };

    let header_value = HeaderValue::try_from(tl_signature)
        .map_err(|err| Error::InvalidArgument(format!("Tl-Signature header value: {err}")))?;
    req.headers_mut().insert(TL_SIGNATURE.clone(), header_value);

    Ok(req)
}

/// Verify the `Tl-Signature` header of a request
///
/// Method, path, headers and body are taken from the request, everything else (key source,
/// required headers) from the passed verifier.
#[instrument(skip_all)]
pub fn verify<'a, B>(req: &'a Request<B>, verifier: Verifier<'a>) -> Result<()>
where
    B: AsRef<[u8]>,
{
    let tl_signature = req
        .headers()
        .get(&TL_SIGNATURE)
        .ok_or(Error::MissingSignature)?
        .to_str()
        .map_err(|_| Error::MalformedSignature("non-ASCII Tl-Signature header".into()))?;

    verifier
        .method(req.method().as_str())
        .path(req.uri().path())
        .headers(
            req.headers()
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_bytes())),
        )
        .body(req.body())
        .verify(tl_signature)
}
