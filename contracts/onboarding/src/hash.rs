//! Hashing helpers.
//!
//! Voucher denoms follow ICS-20: `ibc/` followed by the uppercase hex SHA-256
//! of the full trace path. Token pair contract addresses are EVM style: the
//! last 20 bytes of a keccak256 digest.

use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

/// Prefix of voucher denoms minted by the transfer handler
pub const VOUCHER_PREFIX: &str = "ibc/";

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Uppercase hex SHA-256 of a denom trace path
pub fn denom_trace_hash(full_path: &str) -> String {
    hex::encode_upper(Sha256::digest(full_path.as_bytes()))
}

/// Voucher denom for a trace path, e.g. `transfer/channel-0/uatom`
pub fn voucher_denom(full_path: &str) -> String {
    format!("{}{}", VOUCHER_PREFIX, denom_trace_hash(full_path))
}

pub fn is_voucher(denom: &str) -> bool {
    denom.starts_with(VOUCHER_PREFIX)
}

/// Deterministic token contract address for a denom
pub fn token_pair_address(denom: &str) -> String {
    let mut data = b"token_pair".to_vec();
    data.extend_from_slice(denom.as_bytes());
    let digest = keccak256(&data);
    format!("0x{}", hex::encode(&digest[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(b"");
        assert_eq!(
            hex::encode(hash),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_voucher_denom_matches_ics20() {
        // Well known ATOM voucher on Osmosis
        assert_eq!(
            voucher_denom("transfer/channel-0/uatom"),
            "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
        );
        assert!(is_voucher("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"));
        assert!(!is_voucher("uatom"));
    }

    #[test]
    fn test_token_pair_address_shape() {
        let addr = token_pair_address("ibc/ABC");
        assert!(addr.starts_with("0x"));
        assert_eq!(addr.len(), 42);
        assert_eq!(addr, token_pair_address("ibc/ABC"));
        assert_ne!(addr, token_pair_address("ibc/ABD"));
    }
}
