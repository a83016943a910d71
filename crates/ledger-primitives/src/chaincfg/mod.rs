//! Network parameters.
//!
//! A `ChainParams` value is passed explicitly to the address codec, WIF
//! encoding and the fork-id signature hash. Nothing in the workspace keeps a
//! process-wide default.

use std::fmt;
use std::str::FromStr;

use crate::PrimitivesError;

/// The networks with built-in parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    /// Parameters for this network.
    pub fn params(&self) -> ChainParams {
        match self {
            Network::Mainnet => ChainParams::mainnet(),
            Network::Testnet => ChainParams::testnet(),
            Network::Regtest => ChainParams::regtest(),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(PrimitivesError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Version bytes and signature-hash fork id for one network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainParams {
    pub network: Network,
    /// Version byte of pay-to-pubkey-hash addresses.
    pub p2pkh_prefix: u8,
    /// Version byte of pay-to-script-hash addresses.
    pub p2sh_prefix: u8,
    /// Version byte of WIF private keys.
    pub wif_prefix: u8,
    /// Value shifted into bits 8..32 of the fork-id sighash type word.
    pub fork_id: u32,
}

impl ChainParams {
    pub const fn mainnet() -> Self {
        ChainParams {
            network: Network::Mainnet,
            p2pkh_prefix: 0x00,
            p2sh_prefix: 0x05,
            wif_prefix: 0x80,
            fork_id: 0,
        }
    }

    pub const fn testnet() -> Self {
        ChainParams {
            network: Network::Testnet,
            p2pkh_prefix: 0x6f,
            p2sh_prefix: 0xc4,
            wif_prefix: 0xef,
            fork_id: 0,
        }
    }

    /// Regtest shares the testnet version bytes.
    pub const fn regtest() -> Self {
        ChainParams {
            network: Network::Regtest,
            ..Self::testnet()
        }
    }

    /// Find the network whose P2PKH version byte is `prefix`.
    ///
    /// Testnet wins over regtest since they share the byte.
    pub fn from_p2pkh_prefix(prefix: u8) -> Option<Self> {
        [Self::mainnet(), Self::testnet()]
            .into_iter()
            .find(|p| p.p2pkh_prefix == prefix)
    }

    /// Find the network whose WIF version byte is `prefix`.
    pub fn from_wif_prefix(prefix: u8) -> Option<Self> {
        [Self::mainnet(), Self::testnet()]
            .into_iter()
            .find(|p| p.wif_prefix == prefix)
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup() {
        assert_eq!(ChainParams::from_p2pkh_prefix(0x00), Some(ChainParams::mainnet()));
        assert_eq!(ChainParams::from_p2pkh_prefix(0x6f), Some(ChainParams::testnet()));
        assert_eq!(ChainParams::from_p2pkh_prefix(0x05), None);
        assert_eq!(ChainParams::from_wif_prefix(0xef), Some(ChainParams::testnet()));
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("regtest".parse::<Network>().unwrap(), Network::Regtest);
        assert!("signet".parse::<Network>().is_err());
        assert_eq!(Network::Regtest.params().p2pkh_prefix, 0x6f);
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }
}
