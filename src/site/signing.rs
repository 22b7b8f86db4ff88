//! Tamper-evident cookie values.
//!
//! A signed value is `base64url(timestamp|base64url(value)|mac)` where
//! `mac = HMAC-SHA256(key, name|timestamp|base64url(value))`. Binding the cookie
//! name into the MAC keeps a value issued for one cookie from being replayed
//! under another. Values are authenticated, not encrypted.

use base64ct::{Base64, Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretSlice};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted signing key.
pub const MIN_KEY_LEN: usize = 32;
/// Length of keys produced by [`generate_key`].
pub const GENERATED_KEY_LEN: usize = 64;
/// Signed values older than this are rejected.
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;
/// Tolerated clock drift for timestamps in the future.
const CLOCK_SKEW_SECONDS: i64 = 60;
const SEPARATOR: u8 = b'|';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("signing key is not valid base64")]
    KeyEncoding,
    #[error("signing key must be at least {MIN_KEY_LEN} bytes, got {0}")]
    KeyTooShort(usize),
    #[error("signing key rejected by HMAC")]
    Key,
    #[error("cookie value is not valid base64")]
    Encoding,
    #[error("cookie value is malformed")]
    Malformed,
    #[error("cookie signature does not match")]
    Signature,
    #[error("cookie timestamp is outside the accepted window")]
    Expired,
}

/// Signs and verifies cookie values with a process-wide key.
#[derive(Debug)]
pub struct SignedCookies {
    key: SecretSlice<u8>,
    max_age_seconds: i64,
}

impl SignedCookies {
    /// Build a codec from raw key bytes.
    ///
    /// # Errors
    /// Returns [`CookieError::KeyTooShort`] when the key has fewer than
    /// [`MIN_KEY_LEN`] bytes.
    pub fn new(key: Vec<u8>) -> Result<Self, CookieError> {
        if key.len() < MIN_KEY_LEN {
            return Err(CookieError::KeyTooShort(key.len()));
        }
        Ok(Self {
            key: SecretSlice::from(key),
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
        })
    }

    /// Build a codec from a standard (padded) base64 key.
    ///
    /// # Errors
    /// Returns an error if the key is not base64 or is too short.
    pub fn from_base64(encoded: &str) -> Result<Self, CookieError> {
        let key = Base64::decode_vec(encoded.trim()).map_err(|_| CookieError::KeyEncoding)?;
        Self::new(key)
    }

    #[must_use]
    pub fn with_max_age_seconds(mut self, seconds: i64) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    #[must_use]
    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    /// Sign `value` for the cookie called `name`.
    ///
    /// # Errors
    /// Returns [`CookieError::Key`] if the HMAC can not be keyed.
    pub fn encode(&self, name: &str, value: &str) -> Result<String, CookieError> {
        self.encode_at(name, value, now())
    }

    /// Verify a signed value for the cookie called `name` and return the plain value.
    ///
    /// # Errors
    /// Any malformed, forged, or expired input is an error.
    pub fn decode(&self, name: &str, encoded: &str) -> Result<String, CookieError> {
        self.decode_at(name, encoded, now())
    }

    fn encode_at(&self, name: &str, value: &str, timestamp: i64) -> Result<String, CookieError> {
        let timestamp = timestamp.to_string();
        let value = Base64UrlUnpadded::encode_string(value.as_bytes());
        let tag = self
            .mac(name, timestamp.as_bytes(), value.as_bytes())?
            .finalize()
            .into_bytes();

        let mut raw = Vec::with_capacity(timestamp.len() + value.len() + tag.len() + 2);
        raw.extend_from_slice(timestamp.as_bytes());
        raw.push(SEPARATOR);
        raw.extend_from_slice(value.as_bytes());
        raw.push(SEPARATOR);
        raw.extend_from_slice(&tag);

        Ok(Base64UrlUnpadded::encode_string(&raw))
    }

    fn decode_at(&self, name: &str, encoded: &str, now: i64) -> Result<String, CookieError> {
        let raw = Base64UrlUnpadded::decode_vec(encoded).map_err(|_| CookieError::Encoding)?;

        // The tag is binary and may contain the separator, so it is whatever
        // follows the second one.
        let mut parts = raw.splitn(3, |byte| *byte == SEPARATOR);
        let (Some(timestamp), Some(value), Some(tag)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CookieError::Malformed);
        };

        self.mac(name, timestamp, value)?
            .verify_slice(tag)
            .map_err(|_| CookieError::Signature)?;

        let timestamp: i64 = std::str::from_utf8(timestamp)
            .ok()
            .and_then(|ts| ts.parse().ok())
            .ok_or(CookieError::Malformed)?;
        if timestamp < now - self.max_age_seconds || timestamp > now + CLOCK_SKEW_SECONDS {
            return Err(CookieError::Expired);
        }

        let value = std::str::from_utf8(value).map_err(|_| CookieError::Malformed)?;
        let value = Base64UrlUnpadded::decode_vec(value).map_err(|_| CookieError::Encoding)?;
        String::from_utf8(value).map_err(|_| CookieError::Malformed)
    }

    fn mac(&self, name: &str, timestamp: &[u8], value: &[u8]) -> Result<HmacSha256, CookieError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.key.expose_secret())
            .map_err(|_| CookieError::Key)?;
        mac.update(name.as_bytes());
        mac.update(&[SEPARATOR]);
        mac.update(timestamp);
        mac.update(&[SEPARATOR]);
        mac.update(value);
        Ok(mac)
    }
}

/// Generate a random signing key, standard base64 encoded.
#[must_use]
pub fn generate_key() -> String {
    let mut key = [0u8; GENERATED_KEY_LEN];
    OsRng.fill_bytes(&mut key);
    Base64::encode_string(&key)
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SignedCookies {
        SignedCookies::new(vec![7u8; 64]).unwrap()
    }

    #[test]
    fn encode_then_decode_returns_value() {
        let codec = codec();
        let token = codec.encode("auth", "authenticated").unwrap();
        assert_eq!(codec.decode("auth", &token).unwrap(), "authenticated");
    }

    #[test]
    fn flipped_signature_byte_is_rejected() {
        let codec = codec();
        let token = codec.encode("auth", "authenticated").unwrap();
        let raw = Base64UrlUnpadded::decode_vec(&token).unwrap();

        // Every byte of the 32-byte tag at the end of the payload.
        for offset in 1..=32 {
            let mut tampered = raw.clone();
            let index = tampered.len() - offset;
            tampered[index] ^= 0x01;
            let tampered = Base64UrlUnpadded::encode_string(&tampered);
            assert_eq!(
                codec.decode("auth", &tampered),
                Err(CookieError::Signature),
                "tag byte {offset} from the end"
            );
        }
    }

    #[test]
    fn value_is_bound_to_cookie_name() {
        let codec = codec();
        let token = codec.encode("alerts", "authenticated").unwrap();
        assert_eq!(codec.decode("auth", &token), Err(CookieError::Signature));
    }

    #[test]
    fn other_key_is_rejected() {
        let token = codec().encode("auth", "authenticated").unwrap();
        let other = SignedCookies::new(vec![8u8; 64]).unwrap();
        assert_eq!(other.decode("auth", &token), Err(CookieError::Signature));
    }

    #[test]
    fn expired_and_future_values_are_rejected() {
        let codec = codec().with_max_age_seconds(60);
        let token = codec.encode_at("auth", "authenticated", 1_000).unwrap();

        assert!(codec.decode_at("auth", &token, 1_030).is_ok());
        assert_eq!(
            codec.decode_at("auth", &token, 1_061),
            Err(CookieError::Expired)
        );
        assert_eq!(
            codec.decode_at("auth", &token, 1_000 - CLOCK_SKEW_SECONDS - 1),
            Err(CookieError::Expired)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = codec();
        assert_eq!(codec.decode("auth", "%%%"), Err(CookieError::Encoding));
        let no_separators = Base64UrlUnpadded::encode_string(b"nothing here");
        assert_eq!(
            codec.decode("auth", &no_separators),
            Err(CookieError::Malformed)
        );
        assert!(codec.decode("auth", "").is_err());
    }

    #[test]
    fn short_keys_are_refused() {
        assert_eq!(
            SignedCookies::new(vec![1u8; 16]).unwrap_err(),
            CookieError::KeyTooShort(16)
        );
        assert_eq!(
            SignedCookies::from_base64("not base64!").unwrap_err(),
            CookieError::KeyEncoding
        );
    }

    #[test]
    fn generated_key_is_accepted() {
        let key = generate_key();
        assert_eq!(Base64::decode_vec(&key).unwrap().len(), GENERATED_KEY_LEN);
        assert!(SignedCookies::from_base64(&key).is_ok());
        assert_ne!(key, generate_key());
    }
}
