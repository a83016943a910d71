//! Primitives for the ledger core.
//!
//! - fixed-width byte values (`FixedBytes160/256/512`) and the wire helpers
//!   (`VarInt`, `LedgerReader`, `LedgerWriter`, endian slice access)
//! - hex, reversed-hex, Base58 and Base58Check encoders
//! - SHA-1, SHA-256, SHA-256d, RIPEMD-160, HASH160 and HMAC
//! - network parameters passed explicitly to address and sighash code
//! - secp256k1 keys, signatures and the ECDSA engine with random or
//!   RFC6979 nonces and public-key recovery

pub mod base58;
pub mod chaincfg;
pub mod ec;
pub mod ecdsa;
pub mod encoding;
pub mod fixed;
pub mod hash;
pub mod util;

mod error;
pub use chaincfg::{ChainParams, Network};
pub use error::PrimitivesError;
pub use fixed::{FixedBytes, FixedBytes160, FixedBytes256, FixedBytes512, Hash};
