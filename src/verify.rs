use crate::{
    Error, Jwks, PublicKey, Result, crypto,
    headers::HeaderSet,
    jws::{self, DetachedJws},
    payload,
    sign::{DEFAULT_METHOD, validate_method, validate_path},
};
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, instrument};

/// Request header carrying the signing scheme version for signers predating the `tl_version` claim
pub const VERSION_HEADER: &str = "Tl-Signature-Version";

/// Request header carrying the signed header names for signers predating the `tl_headers` claim
pub const HEADERS_HEADER: &str = "Tl-Signature-Headers";

/// Where the verification key comes from
#[derive(Clone, Debug)]
enum KeySource {
    Key(PublicKey),
    Jwks(Jwks),
}

/// Builder for the verification of a request's `Tl-Signature`
///
/// Headers are matched case-insensitively and in any order.
/// Adding a header twice keeps the last value.
#[derive(Clone, Debug)]
#[must_use]
pub struct Verifier<'a> {
    key: KeySource,
    method: &'a str,
    path: Option<&'a str>,
    headers: HeaderSet<'a>,
    body: &'a [u8],
    required_headers: Vec<&'a str>,
}

impl<'a> Verifier<'a> {
    fn new(key: KeySource) -> Self {
        Self {
            key,
            method: DEFAULT_METHOD,
            path: None,
            headers: HeaderSet::new(),
            body: &[],
            required_headers: Vec::new(),
        }
    }

    /// Verify with a fixed public key
    pub fn from_key(key: PublicKey) -> Self {
        Self::new(KeySource::Key(key))
    }

    /// Verify with the key of the JWKS whose `kid` matches the token's
    pub fn from_jwks(jwks: Jwks) -> Self {
        Self::new(KeySource::Jwks(jwks))
    }

    /// HTTP method of the received request (defaults to `POST`)
    pub fn method(mut self, method: &'a str) -> Self {
        self.method = method;
        self
    }

    /// Path of the received request, starting with `/`
    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    /// Add a received header
    ///
    /// Unsigned headers are ignored, so all headers of the request can be added.
    pub fn header<V>(mut self, name: &'a str, value: &'a V) -> Self
    where
        V: AsRef<[u8]> + ?Sized,
    {
        self.headers.insert(name, value.as_ref());
        self
    }

    /// Add multiple received headers
    pub fn headers<I, N, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a N, &'a V)>,
        N: AsRef<str> + ?Sized + 'a,
        V: AsRef<[u8]> + ?Sized + 'a,
    {
        for (name, value) in headers {
            self.headers.insert(name.as_ref(), value.as_ref());
        }
        self
    }

    /// Body of the received request (defaults to empty)
    pub fn body<B>(mut self, body: &'a B) -> Self
    where
        B: AsRef<[u8]> + ?Sized,
    {
        self.body = body.as_ref();
        self
    }

    /// Require a header to be covered by the signature
    pub fn require_header(mut self, name: &'a str) -> Self {
        self.required_headers.push(name);
        self
    }

    /// Require multiple headers to be covered by the signature
    pub fn require_headers<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.required_headers.extend(names);
        self
    }

    fn resolve_key(&self, jws: &DetachedJws<'_>) -> Result<Cow<'_, PublicKey>> {
        match self.key {
            KeySource::Key(ref key) => Ok(Cow::Borrowed(key)),
            KeySource::Jwks(ref jwks) => {
                let kid = jws.header.kid.as_deref().ok_or(Error::MissingKid)?;
                jwks.resolve(kid).map(Cow::Owned)
            }
        }
    }

    fn fallback_header(&self, name: &str) -> Option<Cow<'a, str>> {
        self.headers.get(name).map(String::from_utf8_lossy)
    }

    /// Verify the `Tl-Signature` against the request
    ///
    /// The verifier isn't consumed and can check further tokens against the same request.
    #[instrument(skip_all)]
    pub fn verify(&self, tl_signature: &str) -> Result<()> {
        let method = validate_method(self.method)?;
        let path = validate_path(self.path)?;

        let jws = DetachedJws::parse(tl_signature)?;
        let key = self.resolve_key(&jws)?;

        match jws.header.alg.as_deref() {
            Some(jws::ALGORITHM) => {}
            Some(alg) => return Err(Error::UnsupportedAlgorithm(alg.to_string())),
            None => return Err(Error::UnsupportedAlgorithm("missing alg".into())),
        }

        let version = match jws.header.tl_version {
            Some(Value::String(ref version)) => Cow::Borrowed(version.as_str()),
            Some(ref other) => return Err(Error::UnsupportedVersion(other.to_string())),
            None => self.fallback_header(VERSION_HEADER).unwrap_or_default(),
        };
        if version != jws::VERSION {
            return Err(Error::UnsupportedVersion(version.into_owned()));
        }

        let tl_headers = match jws.header.tl_headers {
            Some(ref tl_headers) => Cow::Borrowed(tl_headers.as_str()),
            None => self.fallback_header(HEADERS_HEADER).unwrap_or_default(),
        };
        let signed_headers = jws::split_header_names(&tl_headers).collect::<Vec<_>>();

        for required in &self.required_headers {
            let required = required.trim();
            if !signed_headers
                .iter()
                .any(|signed| signed.eq_ignore_ascii_case(required))
            {
                return Err(Error::MissingRequiredHeader(required.to_string()));
            }
        }

        let headers = self
            .headers
            .retain_and_order(signed_headers.iter().copied())?;

        let verify_path = |path: &str| {
            let payload = payload::build(method, path, headers.iter().copied(), self.body);
            let signing_input = jws.signing_input(&payload);
            crypto::verify(signing_input.as_bytes(), &jws.signature, &key)
        };

        match verify_path(path) {
            Ok(()) => Ok(()),
            Err(Error::InvalidSignature) => {
                let Some(toggled) = payload::toggle_trailing_slash(path) else {
                    return Err(Error::InvalidSignature);
                };

                debug!(%path, %toggled, "signature mismatch, retrying with toggled trailing slash");
                verify_path(toggled.as_ref())
            }
            Err(err) => Err(err),
        }
    }
}
