//! Opaque wire-token format for pagination cursors.
//!
//! A token is the URL-safe, unpadded base64 form of the cursor's JSON. It is
//! safe to drop into a query string without further escaping.

use crate::error::CursorCodecError;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use model::pagination::cursor::Cursor;

// Decode bound for untrusted token input.
const MAX_CURSOR_TOKEN_LEN: usize = 4 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct CursorCodec;

impl CursorCodec {
    pub fn encode(&self, cursor: &Cursor) -> Result<String, CursorCodecError> {
        let payload =
            serde_json::to_vec(cursor).map_err(|e| CursorCodecError::Payload(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }

    /// Decodes a token. Surrounding whitespace is trimmed.
    pub fn decode(&self, token: &str) -> Result<Cursor, CursorCodecError> {
        let token = token.trim();

        if token.is_empty() {
            return Err(CursorCodecError::Empty);
        }

        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(CursorCodecError::TooLong {
                len: token.len(),
                max: MAX_CURSOR_TOKEN_LEN,
            });
        }

        let payload = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CursorCodecError::Base64(e.to_string()))?;

        serde_json::from_slice(&payload).map_err(|e| CursorCodecError::Payload(e.to_string()))
    }
}
