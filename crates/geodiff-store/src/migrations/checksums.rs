//! SHA-256 fingerprints of migration SQL
//!
//! The runner stores the fingerprint of every applied migration and refuses
//! to start when an embedded script no longer matches it.

use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of `sql`
pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}
