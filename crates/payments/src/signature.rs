//! Paystack webhook signature verification

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Check a hex-encoded HMAC-SHA512 signature against the raw request body.
///
/// The hash covers the exact bytes as transmitted, so callers must not
/// re-serialize the body before verification. Comparison is constant time.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let computed = hex::encode(mac.finalize().into_bytes());

    computed.as_bytes().ct_eq(signature.as_bytes()).into()
}
