//! Canonical request string.
//!
//! `timestamp || nonce || METHOD || path_and_query || body`, concatenated with
//! no delimiters. Both the signing client and the verifying server go through
//! [`canonical_string`]; the body is taken as raw bytes and never re-serialised.

/// Build the exact byte string that is signed for a request.
///
/// `method` is upper-cased; `path_and_query` is used exactly as transmitted.
pub fn canonical_string(
    timestamp: &str,
    nonce: &str,
    method: &str,
    path_and_query: &str,
    body: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        timestamp.len() + nonce.len() + method.len() + path_and_query.len() + body.len(),
    );
    out.extend_from_slice(timestamp.as_bytes());
    out.extend_from_slice(nonce.as_bytes());
    out.extend_from_slice(method.to_ascii_uppercase().as_bytes());
    out.extend_from_slice(path_and_query.as_bytes());
    out.extend_from_slice(body);
    out
}
