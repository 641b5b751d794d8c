//! Ed25519 key management for JWT signing and verification.

use std::collections::HashMap;
use std::sync::RwLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::SigningKey;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::errors::{DomainError, TokenError};

/// PKCS#8 v1 DER prefix for an Ed25519 private key; the 32 raw key bytes
/// follow the final OCTET STRING header.
const ED25519_PKCS8_HEADER: [u8; 16] = [
    0x30, 0x2e, // SEQUENCE, 46 bytes
    0x02, 0x01, 0x00, // INTEGER version 0
    0x30, 0x05, // SEQUENCE, 5 bytes (algorithm identifier)
    0x06, 0x03, 0x2b, 0x65, 0x70, // OID 1.3.101.112 (Ed25519)
    0x04, 0x22, // OCTET STRING, 34 bytes
    0x04, 0x20, // OCTET STRING, 32 bytes (the actual key)
];

/// Public half of a managed key, as served by the key-distribution endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyEntry {
    /// Key identifier carried in the JWT `kid` header
    pub key_id: String,

    /// Signature algorithm name
    pub algorithm: String,

    /// Base64url-encoded (no padding) 32-byte Ed25519 public key
    pub public_key: String,

    /// When the key stopped being the signing key, if ever
    pub retired_at: Option<DateTime<Utc>>,
}

struct VerifierEntry {
    decoding: DecodingKey,
    public_key: String,
    retired_at: Option<DateTime<Utc>>,
}

struct KeyRing {
    current_id: String,
    signing: EncodingKey,
    keys: HashMap<String, VerifierEntry>,
}

/// Manager for the Ed25519 keypairs used in JWT operations
///
/// Owns the current signing keypair plus retired verification keys kept
/// alive for the overlap window. Rotation is an explicit call, never
/// implicit global state; verification is a pure lookup by key id against
/// the ring snapshot.
///
/// The interior lock is a read-mostly `std::sync::RwLock`: verification
/// paths only read, and nothing awaits while holding it.
pub struct KeyManager {
    overlap_window: Duration,
    ring: RwLock<KeyRing>,
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("overlap_window", &self.overlap_window)
            .finish()
    }
}

impl KeyManager {
    /// Creates a key manager with a freshly generated initial keypair
    ///
    /// # Arguments
    ///
    /// * `overlap_window` - How long a retired key remains valid for
    ///   verification after rotation
    pub fn new(overlap_window: Duration) -> Result<Self, DomainError> {
        let (key_id, signing, entry) = generate_keypair()?;

        let mut keys = HashMap::new();
        keys.insert(key_id.clone(), entry);

        Ok(Self {
            overlap_window,
            ring: RwLock::new(KeyRing {
                current_id: key_id,
                signing,
                keys,
            }),
        })
    }

    /// Returns the current signing key and its identifier
    pub fn current_signing_key(&self) -> Result<(String, EncodingKey), DomainError> {
        let ring = self.read_ring()?;
        Ok((ring.current_id.clone(), ring.signing.clone()))
    }

    /// Returns the identifier of the current signing key
    pub fn current_key_id(&self) -> Result<String, DomainError> {
        let ring = self.read_ring()?;
        Ok(ring.current_id.clone())
    }

    /// Looks up the verification key for a key identifier
    ///
    /// An unknown identifier is indistinguishable from a forged one and
    /// fails as an invalid token. A tracked key retired longer than the
    /// overlap window fails as `KeyUnavailable`: outstanding tokens signed
    /// by it should all have expired by then, so hitting this path means
    /// the external rotation schedule is broken.
    pub fn decoding_key(&self, key_id: &str) -> Result<DecodingKey, DomainError> {
        let ring = self.read_ring()?;

        let entry = ring
            .keys
            .get(key_id)
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;

        if let Some(retired_at) = entry.retired_at {
            if Utc::now() >= retired_at + self.overlap_window {
                return Err(DomainError::Token(TokenError::KeyUnavailable {
                    key_id: key_id.to_string(),
                }));
            }
        }

        Ok(entry.decoding.clone())
    }

    /// Generates a new keypair and makes it current
    ///
    /// The previous signing key is retired but kept verifiable for the
    /// overlap window. Keys retired longer than the window are pruned.
    /// Returns the new key identifier.
    pub fn rotate_key(&self) -> Result<String, DomainError> {
        let (new_id, signing, entry) = generate_keypair()?;
        let now = Utc::now();

        let mut ring = self.write_ring()?;

        // Prune before retiring the previous key so it survives until the
        // next rotation after its window elapses.
        let overlap = self.overlap_window;
        ring.keys
            .retain(|_, key| key.retired_at.map_or(true, |t| now < t + overlap));

        let previous_id = ring.current_id.clone();
        if let Some(previous) = ring.keys.get_mut(&previous_id) {
            previous.retired_at = Some(now);
        }

        ring.keys.insert(new_id.clone(), entry);
        ring.current_id = new_id.clone();
        ring.signing = signing;

        tracing::info!(key_id = %new_id, retired = %previous_id, "signing key rotated");

        Ok(new_id)
    }

    /// Public keys currently valid for verification: the signing key plus
    /// retired keys still inside the overlap window
    pub fn public_keys(&self) -> Result<Vec<PublicKeyEntry>, DomainError> {
        let ring = self.read_ring()?;
        let now = Utc::now();

        let mut entries: Vec<PublicKeyEntry> = ring
            .keys
            .iter()
            .filter(|(_, key)| key.retired_at.map_or(true, |t| now < t + self.overlap_window))
            .map(|(id, key)| PublicKeyEntry {
                key_id: id.clone(),
                algorithm: "EdDSA".to_string(),
                public_key: key.public_key.clone(),
                retired_at: key.retired_at,
            })
            .collect();
        entries.sort_by(|a, b| a.key_id.cmp(&b.key_id));

        Ok(entries)
    }

    fn read_ring(&self) -> Result<std::sync::RwLockReadGuard<'_, KeyRing>, DomainError> {
        self.ring.read().map_err(|_| DomainError::Internal {
            message: "key ring lock poisoned".to_string(),
        })
    }

    fn write_ring(&self) -> Result<std::sync::RwLockWriteGuard<'_, KeyRing>, DomainError> {
        self.ring.write().map_err(|_| DomainError::Internal {
            message: "key ring lock poisoned".to_string(),
        })
    }
}

/// Generates an Ed25519 keypair and wraps it for jsonwebtoken
fn generate_keypair() -> Result<(String, EncodingKey, VerifierEntry), DomainError> {
    let signing_key = SigningKey::generate(&mut OsRng);

    let public_key = URL_SAFE_NO_PAD.encode(signing_key.verifying_key().to_bytes());

    let mut pkcs8_der = Vec::with_capacity(ED25519_PKCS8_HEADER.len() + 32);
    pkcs8_der.extend_from_slice(&ED25519_PKCS8_HEADER);
    pkcs8_der.extend_from_slice(&signing_key.to_bytes());

    let encoding = EncodingKey::from_ed_der(&pkcs8_der);
    let decoding = DecodingKey::from_ed_components(&public_key).map_err(|_| {
        DomainError::Token(TokenError::TokenGenerationFailed)
    })?;

    let key_id = Uuid::new_v4().to_string();

    Ok((
        key_id,
        encoding,
        VerifierEntry {
            decoding,
            public_key,
            retired_at: None,
        },
    ))
}
