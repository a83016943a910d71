//! secp256k1 key and signature types.
//!
//! The curve arithmetic lives in `crate::ecdsa`; these types add parsing,
//! serialization and WIF/address encoding on top of it.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
