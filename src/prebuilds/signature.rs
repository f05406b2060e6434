//
//  bbs-prebuilds
//  prebuilds/signature.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Webhook secrets and delivery signatures.
//!
//! Bitbucket Server signs each delivery of a hook configured with a secret
//! and sends `X-Hub-Signature: sha256=<hex HMAC-SHA256 of the body>`.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Fresh per-installation secret: 32 random bytes, base64url.
pub fn generate_secret() -> String {
    crate::auth::random_token()
}

/// Computes the header value Bitbucket Server sends for `body`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, InvalidLength> {
    let digest = mac(secret, body)?.finalize().into_bytes();
    Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(digest)))
}

/// Checks a delivery's signature header against `secret`, in constant time.
///
/// A header without the `sha256=` prefix or with malformed hex is rejected.
pub fn verify_signature(secret: &str, body: &[u8], header: &str) -> bool {
    let Some(digest) = header.trim().strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest) else {
        return false;
    };

    mac(secret, body).is_ok_and(|mac| mac.verify_slice(&expected).is_ok())
}

fn mac(secret: &str, body: &[u8]) -> Result<HmacSha256, InvalidLength> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "QFoSRuSquT0vVZ6OaCFK";
    const BODY: &[u8] = br#"{"eventKey":"repo:refs_changed"}"#;

    #[test]
    fn test_known_signature_verifies() {
        let header = "sha256=a2246af6dcf36356e6ff59adafb0b15ce365a34470c8a7cc6b241c57a81865b3";

        assert_eq!(sign(SECRET, BODY).unwrap(), header);
        assert!(verify_signature(SECRET, BODY, header));
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let header = sign(SECRET, BODY).unwrap();
        assert!(!verify_signature(SECRET, br#"{"eventKey":"repo:modified"}"#, &header));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let header = sign(SECRET, BODY).unwrap();
        assert!(!verify_signature("foobar123-secret", BODY, &header));
    }

    #[test]
    fn test_malformed_headers_are_rejected() {
        let digest = sign(SECRET, BODY).unwrap();
        let bare = digest.trim_start_matches("sha256=");

        assert!(!verify_signature(SECRET, BODY, bare));
        assert!(!verify_signature(SECRET, BODY, "sha256=not-hex"));
        assert!(!verify_signature(SECRET, BODY, "sha1=abcdef"));
        assert!(!verify_signature(SECRET, BODY, ""));
    }

    #[test]
    fn test_generated_secrets_differ() {
        let a = generate_secret();
        assert_eq!(a.len(), 43);
        assert_ne!(a, generate_secret());
    }
}
