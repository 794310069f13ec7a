//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum, so a
//! `ProtocolError` always means a serialization problem, never a roster
//! or networking one.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into JSON).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed (turning JSON into a Rust value).
    ///
    /// Common causes: malformed JSON, an unknown `event` tag, or a
    /// missing field.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display_mentions_decode() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ProtocolError::Decode(source);
        assert!(err.to_string().starts_with("decode failed"));
    }
}
