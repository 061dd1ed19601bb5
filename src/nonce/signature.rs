//! Pluggable keyed-hash algorithms for token derivation.
//!
//! Tokens are cut from the lowercase hex digest of a keyed hash. The crate
//! ships HMAC-SHA256 as the default and HMAC-MD5 for hosts that must accept
//! tokens minted by the legacy scheme. Custom algorithms implement
//! [`TokenHasher`].

use crate::NonceError;

#[cfg(not(any(feature = "algo-hmac-sha256", feature = "algo-hmac-md5")))]
compile_error!("No digest algorithm available. Enable at least one algo-* feature.");

/// A keyed hash producing hexadecimal digests.
///
/// Implementations hold their key; the engine only ever hands over the
/// message. Digests must be lowercase ASCII hex and deterministic for a given
/// key and message.
///
/// # Example
///
/// ```rust
/// use action_nonce::signature::TokenHasher;
///
/// struct Reversed;
///
/// impl TokenHasher for Reversed {
///     fn name(&self) -> &'static str {
///         "reversed"
///     }
///
///     fn hex_digest(&self, message: &[u8]) -> String {
///         hex::encode(message.iter().rev().copied().collect::<Vec<u8>>())
///     }
/// }
/// ```
pub trait TokenHasher: Send + Sync {
    /// Returns the name/identifier of this algorithm.
    fn name(&self) -> &'static str;

    /// Hashes `message` under the held key.
    fn hex_digest(&self, message: &[u8]) -> String;
}

/// Built-in digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// HMAC with SHA-256.
    #[cfg(feature = "algo-hmac-sha256")]
    HmacSha256,
    /// HMAC with MD5, matching the legacy token format.
    #[cfg(feature = "algo-hmac-md5")]
    HmacMd5,
}

impl Default for DigestAlgorithm {
    #[cfg(feature = "algo-hmac-sha256")]
    fn default() -> Self {
        DigestAlgorithm::HmacSha256
    }

    #[cfg(all(not(feature = "algo-hmac-sha256"), feature = "algo-hmac-md5"))]
    fn default() -> Self {
        DigestAlgorithm::HmacMd5
    }
}

impl DigestAlgorithm {
    /// Keys the algorithm with `key`.
    pub fn keyed(self, key: &[u8]) -> Result<Box<dyn TokenHasher>, NonceError> {
        match self {
            #[cfg(feature = "algo-hmac-sha256")]
            DigestAlgorithm::HmacSha256 => Ok(Box::new(hmac_sha256::HmacSha256Hasher::new(key)?)),
            #[cfg(feature = "algo-hmac-md5")]
            DigestAlgorithm::HmacMd5 => Ok(Box::new(hmac_md5::HmacMd5Hasher::new(key)?)),
        }
    }
}

#[cfg(feature = "algo-hmac-sha256")]
pub mod hmac_sha256 {
    //! HMAC-SHA256 token hasher.

    use super::TokenHasher;
    use crate::NonceError;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    /// HMAC-SHA256 hasher.
    ///
    /// The key schedule is computed once; each digest clones the keyed state.
    ///
    /// ```rust
    /// use action_nonce::signature::TokenHasher;
    /// use action_nonce::signature::hmac_sha256::HmacSha256Hasher;
    ///
    /// let hasher = HmacSha256Hasher::new(b"key")?;
    /// assert_eq!(hasher.hex_digest(b"message").len(), 64);
    /// # Ok::<(), action_nonce::NonceError>(())
    /// ```
    #[derive(Clone)]
    pub struct HmacSha256Hasher {
        mac: Hmac<Sha256>,
    }

    impl HmacSha256Hasher {
        /// Create a hasher keyed with `key`.
        pub fn new(key: &[u8]) -> Result<Self, NonceError> {
            let mac = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|e| NonceError::CryptoError(format!("Invalid HMAC key: {e}")))?;
            Ok(Self { mac })
        }
    }

    impl TokenHasher for HmacSha256Hasher {
        fn name(&self) -> &'static str {
            "hmac-sha256"
        }

        fn hex_digest(&self, message: &[u8]) -> String {
            let mut mac = self.mac.clone();
            mac.update(message);
            hex::encode(mac.finalize().into_bytes())
        }
    }

}

#[cfg(feature = "algo-hmac-md5")]
pub mod hmac_md5 {
    //! HMAC-MD5 token hasher for compatibility with the legacy token format.
    //!
    //! MD5 is used here for short-lived, narrowly scoped tokens only. Prefer
    //! [`HmacSha256Hasher`](super::hmac_sha256::HmacSha256Hasher) unless tokens
    //! have to interoperate with the older scheme.

    use super::TokenHasher;
    use crate::NonceError;
    use hmac::{Hmac, Mac};
    use md5::Md5;

    /// HMAC-MD5 hasher.
    #[derive(Clone)]
    pub struct HmacMd5Hasher {
        mac: Hmac<Md5>,
    }

    impl HmacMd5Hasher {
        /// Create a hasher keyed with `key`.
        pub fn new(key: &[u8]) -> Result<Self, NonceError> {
            let mac = Hmac::<Md5>::new_from_slice(key)
                .map_err(|e| NonceError::CryptoError(format!("Invalid HMAC key: {e}")))?;
            Ok(Self { mac })
        }
    }

    impl TokenHasher for HmacMd5Hasher {
        fn name(&self) -> &'static str {
            "hmac-md5"
        }

        fn hex_digest(&self, message: &[u8]) -> String {
            let mut mac = self.mac.clone();
            mac.update(message);
            hex::encode(mac.finalize().into_bytes())
        }
    }

}
