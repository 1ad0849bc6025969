use base64::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// The token handed to the client after login. Only its SHA-512 hash is kept server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    session_token: String,
}

impl Session {
    pub fn new(session_token: [u8; 16]) -> Self {
        let base64_session_token = BASE64_STANDARD.encode(session_token);
        Self {
            session_token: base64_session_token,
        }
    }

    pub fn token(&self) -> &str {
        &self.session_token
    }
}

/// Hash of a presented base64 token, or `None` if it does not decode
pub fn token_hash(token: &str) -> Option<Vec<u8>> {
    let session_id = BASE64_STANDARD.decode(token.trim()).ok()?;
    Some(Sha512::digest(session_id).to_vec())
}
