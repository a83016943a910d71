//! P2PKH addresses.
//!
//! An address is the Base58Check encoding of a network version byte followed
//! by a 20-byte public key hash. The network is described by an explicit
//! [`ChainParams`] value rather than global state.

use std::fmt;

use ledger_primitives::base58;
use ledger_primitives::ec::PublicKey;
use ledger_primitives::hash::hash160;
use ledger_primitives::{ChainParams, PrimitivesError};

use crate::opcodes::*;
use crate::{Script, ScriptFormatError};

/// A decoded P2PKH address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The Base58Check text form.
    pub address_string: String,
    /// The hash160 of the public key.
    pub public_key_hash: [u8; 20],
    /// Parameters of the network the address belongs to.
    pub chain_params: ChainParams,
}

impl Address {
    /// Parse and validate an address string.
    ///
    /// The version byte selects the network; unknown versions are rejected.
    pub fn from_string(addr: &str) -> Result<Self, ScriptFormatError> {
        let (version, payload) = base58::check_decode(addr).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => ScriptFormatError::Primitives(e),
            other => ScriptFormatError::InvalidAddress(format!("{}: {}", addr, other)),
        })?;
        if payload.len() != 20 {
            return Err(ScriptFormatError::InvalidAddressLength(addr.to_string()));
        }
        let chain_params = ChainParams::from_p2pkh_prefix(version)
            .ok_or(ScriptFormatError::UnsupportedAddress(version))?;

        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&payload);
        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash: pkh,
            chain_params,
        })
    }

    /// Build an address from a public key hash for the given network.
    pub fn from_public_key_hash(hash: &[u8; 20], params: &ChainParams) -> Self {
        Address {
            address_string: base58::check_encode(params.p2pkh_prefix, hash),
            public_key_hash: *hash,
            chain_params: *params,
        }
    }

    /// Build an address from a public key.
    pub fn from_public_key(key: &PublicKey, params: &ChainParams) -> Self {
        Self::from_public_key_hash(&key.hash160(), params)
    }

    /// Build an address from a hex-encoded serialized public key.
    pub fn from_public_key_hex(pub_key_hex: &str, params: &ChainParams) -> Result<Self, ScriptFormatError> {
        let bytes = hex::decode(pub_key_hex)?;
        Ok(Self::from_public_key_hash(&hash160(&bytes), params))
    }

    /// The P2PKH locking script paying to this address.
    pub fn locking_script(&self) -> Script {
        let mut b = Vec::with_capacity(25);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(&self.public_key_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script::from(b)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

#[cfg(test)]
mod tests {
    //! Address parsing, generation and network detection.

    use super::*;
    use ledger_primitives::Network;

    const PKH_HEX: &str = "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b";

    /// Mainnet and testnet addresses share the same hash, differing by version.
    #[test]
    fn test_from_string_networks() {
        let cases = [
            ("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr", Network::Mainnet),
            ("mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd", Network::Testnet),
        ];
        for (s, network) in cases {
            let addr = Address::from_string(s).expect("should parse");
            assert_eq!(addr.address_string, s);
            assert_eq!(hex::encode(addr.public_key_hash), PKH_HEX);
            assert_eq!(addr.chain_params.network, network, "network of {}", s);
        }
    }

    #[test]
    fn test_from_public_key_hash_roundtrip() {
        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&hex::decode(PKH_HEX).expect("valid hex"));
        let main = Address::from_public_key_hash(&pkh, &ChainParams::mainnet());
        assert_eq!(main.to_string(), "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr");
        let test = Address::from_public_key_hash(&pkh, &ChainParams::testnet());
        assert_eq!(test.to_string(), "mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd");
    }

    #[test]
    fn test_from_public_key_hex() {
        let addr = Address::from_public_key_hex(
            "026cf33373a9f3f6c676b75b543180703df225f7f8edbffedc417718a8ad4e89ce",
            &ChainParams::mainnet(),
        )
        .expect("valid key hex");
        let again = Address::from_string(&addr.address_string).expect("should parse");
        assert_eq!(again.public_key_hash, addr.public_key_hash);
    }

    #[test]
    fn test_from_string_errors() {
        assert!(matches!(
            Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMs"),
            Err(ScriptFormatError::Primitives(PrimitivesError::ChecksumMismatch))
        ));
        assert!(Address::from_string("0OIl").is_err());
        // Valid Base58Check but a 3-byte payload.
        let short = base58::check_encode(0x00, &[1, 2, 3]);
        assert!(matches!(
            Address::from_string(&short),
            Err(ScriptFormatError::InvalidAddressLength(_))
        ));
        let unknown = base58::check_encode(0x42, &[0u8; 20]);
        assert!(matches!(
            Address::from_string(&unknown),
            Err(ScriptFormatError::UnsupportedAddress(0x42))
        ));
    }

    #[test]
    fn test_locking_script() {
        let addr = Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr").expect("should parse");
        let script = addr.locking_script();
        assert!(script.is_p2pkh());
        assert_eq!(script.public_key_hash().expect("p2pkh"), addr.public_key_hash);
    }
}
