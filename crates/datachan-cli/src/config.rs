// ============================================
// File: crates/datachan-cli/src/config.rs
// ============================================
//! # Channel Configuration
//!
//! ## Creation Reason
//! Describes one endpoint of a data channel in a TOML file: cipher, key
//! id, optional peer id, and base64 key material for both directions.
//!
//! ## Main Functionality
//! - `ChannelConfig`: main configuration structure
//! - TOML loading, validation and saving
//! - Random key generation and the mirrored peer config
//! - `build_codec`: turns a validated config into a ready codec
//!
//! ## Example Configuration
//! ```toml
//! cipher = "AES-256-GCM"
//! key_id = 0
//! peer_id = 7
//!
//! [keys.encrypt]
//! cipher_key = "<base64>"
//! salt_key = "<base64>"
//!
//! [keys.decrypt]
//! cipher_key = "<base64>"
//! salt_key = "<base64>"
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Config files hold raw session keys; they are written with mode 0600
//! - Key strings are zeroized on drop and never appear in `Debug` output
//! - `peer_id` omitted (or 16777215) means 1-byte headers
//!
//! ## Last Modified
//! v0.1.0 - Initial channel configuration

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use datachan_common::{KeyId, PeerId};
use datachan_core::crypto::{CipherSuite, DirectionKeys, SecretBytes, SessionKeys, DIRECTION_SALT_SIZE};
use datachan_core::protocol::{DataChannelCodec, HeaderVariant};

use crate::error::{CliError, Result};

/// Length of generated salt-source keys.
pub const GENERATED_SALT_KEY_LEN: usize = 32;

// ============================================
// ChannelConfig
// ============================================

/// Configuration for one endpoint of a data channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// AEAD suite name.
    #[serde(default)]
    pub cipher: CipherSuite,

    /// Key id written into outgoing headers.
    #[serde(default)]
    pub key_id: KeyId,

    /// Peer id; enables 4-byte headers when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<PeerId>,

    /// Key material for both directions.
    pub keys: KeysConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChannelConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| CliError::config_load(&path_str, e.to_string()))?;
        let content = Zeroizing::new(content);

        let config: Self =
            toml::from_str(&content).map_err(|e| CliError::config_load(&path_str, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    ///
    /// # Errors
    /// Returns error if the string cannot be parsed or validated.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every key decodes and is long enough for the suite.
    ///
    /// # Errors
    /// Returns `KeyDecode` or `ConfigInvalid` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        self.session_keys().map(|_| ())
    }

    /// Decodes the key material.
    ///
    /// # Errors
    /// Same as [`validate`](Self::validate).
    pub fn session_keys(&self) -> Result<SessionKeys> {
        let encrypt = self.keys.encrypt.decode("keys.encrypt", self.cipher)?;
        let decrypt = self.keys.decrypt.decode("keys.decrypt", self.cipher)?;
        Ok(SessionKeys::new(encrypt, decrypt))
    }

    /// Header variant selected by `peer_id`.
    #[must_use]
    pub const fn header_variant(&self) -> HeaderVariant {
        HeaderVariant::from_peer_id(self.peer_id)
    }

    /// Builds a keyed codec with the configured header variant.
    ///
    /// # Errors
    /// Returns error if the keys do not validate.
    pub fn build_codec(&self) -> Result<DataChannelCodec> {
        let keys = self.session_keys()?;
        let mut codec = DataChannelCodec::with_keys(self.cipher, &keys)?;
        codec.set_peer_id(self.peer_id);
        Ok(codec)
    }

    /// Generates a config with fresh random keys from the OS RNG.
    #[must_use]
    pub fn generate(cipher: CipherSuite, key_id: KeyId, peer_id: Option<PeerId>) -> Self {
        Self {
            cipher,
            key_id,
            peer_id,
            keys: KeysConfig {
                encrypt: DirectionKeyConfig::generate(cipher),
                decrypt: DirectionKeyConfig::generate(cipher),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Returns the other endpoint's config: same settings, directions swapped.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            keys: KeysConfig {
                encrypt: self.keys.decrypt.clone(),
                decrypt: self.keys.encrypt.clone(),
            },
            ..self.clone()
        }
    }

    /// Serializes configuration to a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::config_invalid("<config>", e.to_string()))
    }

    /// Writes the config to `path`, readable by the owner only.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = Zeroizing::new(self.to_toml()?);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

// ============================================
// KeysConfig
// ============================================

/// Key material section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Keys for packets this endpoint seals.
    pub encrypt: DirectionKeyConfig,
    /// Keys for packets this endpoint opens.
    pub decrypt: DirectionKeyConfig,
}

/// Base64 key strings for one direction.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DirectionKeyConfig {
    /// AES key, base64.
    pub cipher_key: String,
    /// Nonce salt source, base64.
    pub salt_key: String,
}

impl DirectionKeyConfig {
    /// Generates random keys sized for `cipher`.
    #[must_use]
    pub fn generate(cipher: CipherSuite) -> Self {
        Self {
            cipher_key: random_base64(cipher.key_len()),
            salt_key: random_base64(GENERATED_SALT_KEY_LEN),
        }
    }

    fn decode(&self, section: &str, cipher: CipherSuite) -> Result<DirectionKeys> {
        let cipher_key = decode_key(&format!("{section}.cipher_key"), &self.cipher_key, cipher.key_len())?;
        let salt_key = decode_key(&format!("{section}.salt_key"), &self.salt_key, DIRECTION_SALT_SIZE)?;
        Ok(DirectionKeys { cipher_key, salt_key })
    }
}

impl fmt::Debug for DirectionKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectionKeyConfig")
            .field("cipher_key", &"[REDACTED]")
            .field("salt_key", &"[REDACTED]")
            .finish()
    }
}

fn decode_key(field: &str, encoded: &str, min_len: usize) -> Result<SecretBytes> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CliError::key_decode(field, e.to_string()))?;
    let key = SecretBytes::new(bytes);
    if key.len() < min_len {
        return Err(CliError::config_invalid(
            field,
            format!("need at least {min_len} bytes, got {}", key.len()),
        ));
    }
    Ok(key)
}

fn random_base64(len: usize) -> String {
    let mut buf = Zeroizing::new(vec![0u8; len]);
    OsRng.fill_bytes(&mut buf);
    STANDARD.encode(&*buf)
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use datachan_common::PacketId;

    fn b64(byte: u8, len: usize) -> String {
        STANDARD.encode(vec![byte; len])
    }

    fn sample_toml() -> String {
        format!(
            r#"
            cipher = "aes-128-gcm"
            key_id = 2
            peer_id = 513

            [keys.encrypt]
            cipher_key = "{}"
            salt_key = "{}"

            [keys.decrypt]
            cipher_key = "{}"
            salt_key = "{}"

            [logging]
            level = "debug"
            "#,
            b64(1, 16),
            b64(2, 32),
            b64(3, 16),
            b64(4, 32),
        )
    }

    #[test]
    fn test_parse_config() {
        let config = ChannelConfig::from_str(&sample_toml()).unwrap();
        assert_eq!(config.cipher, CipherSuite::AES_128_GCM);
        assert_eq!(config.key_id.as_u8(), 2);
        assert_eq!(config.peer_id, Some(PeerId::new(513).unwrap()));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.header_variant(), HeaderVariant::Enabled(PeerId::new(513).unwrap()));
    }

    #[test]
    fn test_defaults() {
        let toml = format!(
            r#"
            [keys.encrypt]
            cipher_key = "{k}"
            salt_key = "{k}"

            [keys.decrypt]
            cipher_key = "{k}"
            salt_key = "{k}"
            "#,
            k = b64(9, 32)
        );
        let config = ChannelConfig::from_str(&toml).unwrap();
        assert_eq!(config.cipher, CipherSuite::AES_256_GCM);
        assert_eq!(config.key_id, KeyId::default());
        assert_eq!(config.peer_id, None);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.header_variant(), HeaderVariant::Disabled);
    }

    #[test]
    fn test_rejects_short_cipher_key() {
        // 16-byte key with the default AES-256 suite
        let toml = sample_toml().replace("aes-128-gcm", "aes-256-gcm");
        let err = ChannelConfig::from_str(&toml).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("keys.encrypt.cipher_key"));
    }

    #[test]
    fn test_rejects_bad_base64() {
        let toml = sample_toml().replace(&b64(4, 32), "not base64!!");
        let err = ChannelConfig::from_str(&toml).unwrap_err();
        assert!(matches!(err, CliError::KeyDecode { ref field, .. } if field == "keys.decrypt.salt_key"));
    }

    #[test]
    fn test_rejects_unknown_cipher_and_out_of_range_ids() {
        let bad_cipher = sample_toml().replace("aes-128-gcm", "bf-cbc");
        assert!(ChannelConfig::from_str(&bad_cipher).is_err());

        let bad_key_id = sample_toml().replace("key_id = 2", "key_id = 40");
        assert!(ChannelConfig::from_str(&bad_key_id).is_err());

        let bad_peer = sample_toml().replace("peer_id = 513", "peer_id = 16777216");
        assert!(ChannelConfig::from_str(&bad_peer).is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = ChannelConfig::from_str(&sample_toml()).unwrap();
        let printed = format!("{config:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(&b64(1, 16)));
    }

    #[test]
    fn test_generated_configs_interoperate() {
        let local = ChannelConfig::generate(CipherSuite::AES_192_GCM, KeyId::new(1).unwrap(), None);
        let remote = ChannelConfig::from_str(&local.mirrored().to_toml().unwrap()).unwrap();

        let frame = local
            .build_codec()
            .unwrap()
            .encode(local.key_id, PacketId::new(3), b"hello")
            .unwrap();
        let (packet_id, payload) = remote.build_codec().unwrap().decode(&frame).unwrap();
        assert_eq!(packet_id, PacketId::new(3));
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("channel.toml");

        let config = ChannelConfig::generate(CipherSuite::AES_256_GCM, KeyId::default(), PeerId::new(7).ok());
        config.save(&path).unwrap();
        let loaded = ChannelConfig::load(&path).unwrap();
        assert_eq!(loaded.peer_id, config.peer_id);
        assert_eq!(loaded.session_keys().unwrap(), config.session_keys().unwrap());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
