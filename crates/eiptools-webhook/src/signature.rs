//! HMAC-SHA512 request signatures.
//!
//! The sender signs the raw request body with the shared secret and sends
//! the hex-encoded MAC in [`SIGNATURE_HEADER`].

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::WebhookError;

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the hex-encoded body signature.
pub const SIGNATURE_HEADER: &str = "x-neynar-signature";

fn mac(secret: &str) -> Result<HmacSha512, WebhookError> {
    <HmacSha512 as Mac>::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::MissingSecret)
}

/// Hex-encoded HMAC-SHA512 of `body` under `secret`.
///
/// ```rust
/// use eiptools_webhook::{sign_payload, verify_signature};
///
/// let sig = sign_payload("secret", b"{}").unwrap();
/// assert_eq!(sig.len(), 128);
/// assert!(verify_signature("secret", b"{}", &sig).is_ok());
/// ```
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = mac(secret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check `header_hex` against the HMAC-SHA512 of `body`.
///
/// The comparison is constant-time. Hex digits may be upper or lower case.
pub fn verify_signature(secret: &str, body: &[u8], header_hex: &str) -> Result<(), WebhookError> {
    let expected = hex::decode(header_hex.trim()).map_err(|_| WebhookError::InvalidSignature)?;
    let mut mac = mac(secret)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"type":"cast.created","data":{"text":"EIP-1559","hash":"0xabc"}}"#;

    #[test]
    fn test_accepts_valid_signature() {
        let sig = sign_payload("shh", BODY).unwrap();
        assert!(verify_signature("shh", BODY, &sig).is_ok());
        assert!(verify_signature("shh", BODY, &sig.to_uppercase()).is_ok());
    }

    #[test]
    fn test_rejects_tampered_body() {
        let sig = sign_payload("shh", BODY).unwrap();
        let tampered = br#"{"type":"cast.created","data":{"text":"EIP-4844","hash":"0xabc"}}"#;
        assert!(matches!(
            verify_signature("shh", tampered, &sig),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let sig = sign_payload("shh", BODY).unwrap();
        assert!(verify_signature("other", BODY, &sig).is_err());
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(verify_signature("shh", BODY, "not-hex").is_err());
        assert!(verify_signature("shh", BODY, "").is_err());
        let truncated = &sign_payload("shh", BODY).unwrap()[..64];
        assert!(verify_signature("shh", BODY, truncated).is_err());
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2.
        let sig = sign_payload("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }
}
