use crate::{
    BoxError, Error, Result,
    crypto::SigningKey,
    headers::HeaderSet,
    jws::{self, JwsHeader},
    payload,
};
use std::future::Future;
use tracing::{debug, instrument};

/// Method used when none is set explicitly
pub(crate) const DEFAULT_METHOD: &str = "POST";

/// Make sure the path can be put into the payload as-is
pub(crate) fn validate_path(path: Option<&str>) -> Result<&str> {
    let path = path.ok_or_else(|| Error::InvalidArgument("path is required".into()))?;
    if !path.starts_with('/') {
        return Err(Error::InvalidArgument(format!(
            "path \"{path}\" doesn't start with \"/\""
        )));
    }

    Ok(path)
}

/// Make sure the method is a non-empty token
pub(crate) fn validate_method(method: &str) -> Result<&str> {
    if method.is_empty() || method.bytes().any(|byte| byte.is_ascii_whitespace()) {
        return Err(Error::InvalidArgument(format!(
            "method \"{method}\" isn't a valid HTTP method"
        )));
    }

    Ok(method)
}

/// Signing strategy backed by a synchronous closure
///
/// The closure receives the JWS signing input and returns the base64url encoded signature.
pub struct CustomSigner<F>(F);

impl<F> CustomSigner<F> {
    /// Wrap a signing closure
    pub fn new(sign_fn: F) -> Self {
        Self(sign_fn)
    }
}

impl<F, E> SigningKey for CustomSigner<F>
where
    F: Fn(&str) -> Result<String, E>,
    E: Into<BoxError>,
{
    #[inline]
    fn sign(&self, signing_input: &str) -> Result<String, BoxError> {
        (self.0)(signing_input).map_err(Into::into)
    }
}

/// Signing strategy backed by an asynchronous closure
///
/// Used through [`Signer::sign_async`]
pub struct AsyncSigner<F>(F);

impl<F> AsyncSigner<F> {
    /// Wrap an asynchronous signing closure
    pub fn new(sign_fn: F) -> Self {
        Self(sign_fn)
    }
}

/// Everything needed to produce the signature, computed from the builder in one go
struct Prepared<K> {
    key: K,
    encoded_header: String,
    signing_input: String,
}

/// Builder for the `Tl-Signature` of a request
///
/// Headers are signed in the order they are added.
/// Builder errors (such as a duplicate header) are kept until [`Signer::sign`] reports them.
#[must_use]
pub struct Signer<'a, K> {
    kid: &'a str,
    key: K,
    method: &'a str,
    path: Option<&'a str>,
    headers: HeaderSet<'a>,
    body: &'a [u8],
    jku: Option<&'a str>,
    error: Option<Error>,
}

impl<'a, K> Signer<'a, K> {
    /// Start a new signature with the given key ID and signing strategy
    pub fn new(kid: &'a str, key: K) -> Self {
        Self {
            kid,
            key,
            method: DEFAULT_METHOD,
            path: None,
            headers: HeaderSet::new(),
            body: &[],
            jku: None,
            error: None,
        }
    }

    /// HTTP method of the request (defaults to `POST`)
    pub fn method(mut self, method: &'a str) -> Self {
        self.method = method;
        self
    }

    /// Path of the request, starting with `/`
    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    /// Add a header to the signature
    pub fn header<V>(mut self, name: &'a str, value: &'a V) -> Self
    where
        V: AsRef<[u8]> + ?Sized,
    {
        let result = if name.trim().is_empty() || name.contains(',') {
            Err(Error::InvalidArgument(format!(
                "header name \"{name}\" can't be signed"
            )))
        } else {
            self.headers.try_insert(name, value.as_ref())
        };

        if let Err(err) = result {
            self.error.get_or_insert(err);
        }

        self
    }

    /// Add multiple headers to the signature
    pub fn headers<I, N, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (&'a N, &'a V)>,
        N: AsRef<str> + ?Sized + 'a,
        V: AsRef<[u8]> + ?Sized + 'a,
    {
        headers
            .into_iter()
            .fold(self, |signer, (name, value)| signer.header(name.as_ref(), value))
    }

    /// Body of the request (defaults to empty)
    pub fn body<B>(mut self, body: &'a B) -> Self
    where
        B: AsRef<[u8]> + ?Sized,
    {
        self.body = body.as_ref();
        self
    }

    /// URL of the JWKS the verifier can find the public key in
    pub fn jku(mut self, jku: &'a str) -> Self {
        self.jku = Some(jku);
        self
    }

    fn prepare(self) -> Result<Prepared<K>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let method = validate_method(self.method)?;
        let path = validate_path(self.path)?;

        let encoded_header = JwsHeader::new(self.kid, self.headers.names(), self.jku).encode()?;
        let payload = payload::build(method, path, self.headers.iter(), self.body);
        let signing_input = jws::signing_input(&encoded_header, &payload);

        debug!(kid = self.kid, headers = self.headers.len(), "prepared signing input");

        Ok(Prepared {
            key: self.key,
            encoded_header,
            signing_input,
        })
    }
}

impl<K> Signer<'_, K>
where
    K: SigningKey,
{
    /// Sign the request, returning the detached JWS for the `Tl-Signature` header
    #[instrument(skip_all)]
    pub fn sign(self) -> Result<String> {
        let Prepared {
            key,
            encoded_header,
            signing_input,
        } = self.prepare()?;

        let signature = key.sign(&signing_input).map_err(Error::Signing)?;
        Ok(jws::serialise(&encoded_header, &signature))
    }
}

impl<F, Fut, E> Signer<'_, AsyncSigner<F>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Into<BoxError>,
{
    /// Sign the request with the asynchronous signing closure
    ///
    /// The closure receives the JWS signing input and returns the base64url encoded signature.
    #[instrument(skip_all)]
    pub async fn sign_async(self) -> Result<String> {
        let Prepared {
            key: AsyncSigner(sign_fn),
            encoded_header,
            signing_input,
        } = self.prepare()?;

        let signature = sign_fn(signing_input)
            .await
            .map_err(|err| Error::Signing(err.into()))?;

        Ok(jws::serialise(&encoded_header, &signature))
    }
}
