/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use base64::Engine as _;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

const STATE_SIZE: usize = 10;
const VERIFIER_SIZE: usize = 32;

pub(crate) const CHALLENGE_METHOD: &str = "S256";

/// Random value echoed back on the redirect, tying the callback to this login
pub(crate) fn state_nonce() -> String {
    let bytes: [u8; STATE_SIZE] = rand::random();
    URL_SAFE.encode(bytes)
}

/// PKCE code verifier (RFC 7636)
#[derive(Clone)]
pub(crate) struct Verifier(String);

impl Verifier {
    pub(crate) fn generate() -> Self {
        let bytes: [u8; VERIFIER_SIZE] = rand::random();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    #[cfg(test)]
    fn from_string(verifier: &str) -> Self {
        Self(verifier.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// S256 challenge sent with the authorization request
    pub(crate) fn challenge(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Verifier").field(&"xxx").finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn challenge_matches_rfc7636_example() {
        let verifier = Verifier::from_string("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(
            verifier.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn generated_values_are_url_safe() {
        let verifier = Verifier::generate();
        // 32 bytes unpadded
        assert_eq!(verifier.as_str().len(), 43);
        assert!(
            verifier
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );

        let state = state_nonce();
        assert_eq!(state.len(), 16);
        assert_ne!(state, state_nonce());
    }
}
