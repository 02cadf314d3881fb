//! Codec trait and implementations for serializing/deserializing bodies.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The layers above don't care HOW bodies are serialized: the API gateway
//! decodes responses through a [`Codec`], and the session store encodes the
//! persisted user record through one.
//!
//! The marketplace backend only speaks JSON, so [`JsonCodec`] is the one
//! implementation shipped here.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → safe to share between threads; the gateway is used
///   from Tokio tasks that may run on any worker thread.
/// - `'static` → the codec owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` header value for bodies produced by this codec.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use household_protocol::{ApiMessage, Category, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg: ApiMessage = codec
///     .decode(br#"{"message":"Service created","category":"success"}"#)
///     .unwrap();
/// assert_eq!(msg.category, Some(Category::Success));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoginRequest, Role};

    #[test]
    fn test_json_codec_encode_login_request_uses_field_names() {
        let codec = JsonCodec;
        let req = LoginRequest {
            username: "ann@example.com".into(),
            password: "pw".into(),
        };

        let bytes = codec.encode(&req).expect("encode should succeed");
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains(r#""username":"ann@example.com""#));
        assert!(text.contains(r#""password":"pw""#));
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_decode_error() {
        let codec = JsonCodec;

        let result: Result<Role, _> = codec.decode(b"<html>502</html>");

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_content_type_is_json() {
        assert_eq!(JsonCodec.content_type(), "application/json");
    }
}
