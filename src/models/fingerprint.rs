use std::fmt;

use sha2::{Digest as _, Sha256};

use super::params::Params;
use crate::data::Digest;

/// Identity of one model run: both datasets, the adapter type and its params.
///
/// Computed as SHA-256 over the four components in this order, each prefixed
/// by its byte length as a big-endian u64:
///
/// 1. fit data digest (32 bytes)
/// 2. predict data digest (32 bytes)
/// 3. adapter name (UTF-8)
/// 4. params as JSON with sorted keys (UTF-8)
///
/// The value depends only on those bytes, so it is stable across runs,
/// processes and platforms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn combine(dfit: &Digest, dpre: &Digest, name: &str, params: &Params) -> Self {
        let params_json = params.to_json();
        let parts: [&[u8]; 4] = [
            dfit.as_bytes(),
            dpre.as_bytes(),
            name.as_bytes(),
            params_json.as_bytes(),
        ];

        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Leading 8 bytes as an integer, for callers that key caches on u64
    pub fn as_u64(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(head)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}
