//!
//! Canonical signing payload
//!

use std::borrow::Cow;

/// Construct the signing payload of a request
///
/// ```text
/// {METHOD} {path}\n
/// {name}: {value}\n     (for every header, in the given order)
/// {body}
/// ```
///
/// The method is uppercased, everything else is used verbatim.
///
/// Header names and values aren't escaped. A value containing a newline produces a payload that
/// can't be split back into its headers unambiguously. Verification never re-parses the payload
/// (it rebuilds it from the already separated headers), so this only matters to consumers that
/// try to recover headers from payload bytes.
#[must_use]
pub fn build<'h, I>(method: &str, path: &str, headers: I, body: &[u8]) -> Vec<u8>
where
    I: IntoIterator<Item = (&'h str, &'h [u8])>,
{
    let mut payload = Vec::with_capacity(method.len() + path.len() + body.len() + 2);

    payload.extend(method.bytes().map(|byte| byte.to_ascii_uppercase()));
    payload.push(b' ');
    payload.extend_from_slice(path.as_bytes());
    payload.push(b'\n');

    for (name, value) in headers {
        payload.extend_from_slice(name.as_bytes());
        payload.extend_from_slice(b": ");
        payload.extend_from_slice(value);
        payload.push(b'\n');
    }

    payload.extend_from_slice(body);
    payload
}

/// The path with its trailing slash toggled (added if absent, removed if present)
///
/// Returns `None` for the root path since its toggled form would be empty.
#[must_use]
pub fn toggle_trailing_slash(path: &str) -> Option<Cow<'_, str>> {
    match path.strip_suffix('/') {
        Some("") => None,
        Some(stripped) => Some(Cow::Borrowed(stripped)),
        None => Some(Cow::Owned(format!("{path}/"))),
    }
}
