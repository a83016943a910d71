//! Script type - a sequence of opcodes and data pushes.
//!
//! Scripts are used in transaction inputs (unlocking) and outputs (locking)
//! to define spending conditions. `Script` owns its bytes; parsing into
//! operands is lazy and borrows from the script.

use std::fmt;

use ledger_primitives::hash::hash160;

use crate::opcodes::*;
use crate::operand::{push_data_prefix, Operand, Operands};
use crate::ScriptFormatError;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptFormatError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from an ASM string.
    ///
    /// Tokens carrying the `OP_` prefix are opcodes; every other token is hex
    /// push data, so a token like `16` is a one-byte push and not `OP_16`.
    ///
    /// # Arguments
    /// * `asm` - A space-separated ASM string.
    ///
    /// # Returns
    /// A `Script`, or an error if any token is neither an opcode nor hex.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptFormatError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            if token.get(..3).map_or(false, |p| p.eq_ignore_ascii_case("OP_")) {
                let opcode = string_to_opcode(token)
                    .ok_or_else(|| ScriptFormatError::InvalidAsmToken(token.to_string()))?;
                script.append_opcodes(&[opcode])?;
            } else {
                let data = hex::decode(token)
                    .map_err(|_| ScriptFormatError::InvalidAsmToken(token.to_string()))?;
                script.append_push_data(&data)?;
            }
        }
        Ok(script)
    }

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Convert the script to its ASM representation.
    ///
    /// Data pushes appear as their hex encoding; opcodes appear by name.
    /// Returns an empty string for scripts that fail to parse.
    pub fn to_asm(&self) -> String {
        let tokens: Result<Vec<String>, _> = self
            .operands()
            .map(|op| op.map(|o| o.to_asm_string()))
            .collect();
        match tokens {
            Ok(tokens) => tokens.join(" "),
            Err(_) => String::new(),
        }
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lazily parse the script into operands.
    ///
    /// Each call starts a fresh pass from the first byte.
    pub fn operands(&self) -> Operands<'_> {
        Operands::new(&self.0)
    }

    /// Check whether the script contains only push operations.
    ///
    /// `OP_1NEGATE`, `OP_RESERVED` and `OP_1`..`OP_16` count as pushes.
    /// A script that fails to parse is not push-only.
    pub fn is_push_only(&self) -> bool {
        self.operands().all(|op| match op {
            Ok(o) => o.opcode <= OP_16,
            Err(_) => false,
        })
    }

    /// Check if this is a Pay-to-Public-Key-Hash (P2PKH) output script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Check if this is a data output script (OP_RETURN or OP_FALSE OP_RETURN).
    pub fn is_data(&self) -> bool {
        let b = &self.0;
        (!b.is_empty() && b[0] == OP_RETURN)
            || (b.len() > 1 && b[0] == OP_FALSE && b[1] == OP_RETURN)
    }

    /// Extract the 20-byte public key hash from a P2PKH script.
    pub fn public_key_hash(&self) -> Result<[u8; 20], ScriptFormatError> {
        if self.0.is_empty() {
            return Err(ScriptFormatError::EmptyScript);
        }
        if !self.is_p2pkh() {
            return Err(ScriptFormatError::NotP2PKH);
        }
        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&self.0[3..23]);
        Ok(pkh)
    }

    /// Build the P2SH locking script that commits to this script's hash160.
    pub fn to_p2sh(&self) -> Script {
        let mut b = Vec::with_capacity(23);
        b.push(OP_HASH160);
        b.push(OP_DATA_20);
        b.extend_from_slice(&hash160(&self.0));
        b.push(OP_EQUAL);
        Script(b)
    }

    /// Append data bytes with the smallest PUSHDATA prefix that fits.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptFormatError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append raw opcodes to the script.
    ///
    /// Rejects push data opcodes (OP_DATA_1..OP_PUSHDATA4); use
    /// `append_push_data` for those.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptFormatError> {
        if let Some(&op) = opcodes.iter().find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op)) {
            return Err(ScriptFormatError::InvalidOpcodeType(opcode_to_string(op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }

    /// Return a copy of the script with every push of exactly `data` removed.
    ///
    /// Only pushes that use the canonical prefix for `data` are matched.
    /// Bytes that fail to parse are carried over untouched.
    pub fn find_and_delete(&self, data: &[u8]) -> Script {
        let target = match push_data_prefix(data.len()) {
            Ok(mut prefix) => {
                prefix.extend_from_slice(data);
                prefix
            }
            Err(_) => return self.clone(),
        };
        self.filter_operands(|op| op.to_bytes() != target)
    }

    /// Return a copy of the script with all OP_CODESEPARATORs removed.
    pub fn remove_codeseparators(&self) -> Script {
        self.filter_operands(|op| op.opcode != OP_CODESEPARATOR)
    }

    fn filter_operands<F>(&self, keep: F) -> Script
    where
        F: Fn(&Operand<'_>) -> bool,
    {
        let mut out = Vec::with_capacity(self.0.len());
        let mut it = self.operands();
        loop {
            let start = it.position();
            match it.next() {
                Some(Ok(op)) => {
                    if keep(&op) {
                        out.extend_from_slice(&self.0[start..it.position()]);
                    }
                }
                Some(Err(_)) => {
                    out.extend_from_slice(&self.0[start..]);
                    break;
                }
                None => break,
            }
        }
        Script(out)
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    //! Tests for the Script type.
    //!
    //! Covers hex and ASM construction, classification, public key hash
    //! extraction, push building, and the script code editing helpers used
    //! by signature checking.

    use super::*;

    const P2PKH_HEX: &str = "76a914e2a623699e81b291c0327f408fea765d534baa2a88ac";

    #[test]
    fn test_from_hex_roundtrip() {
        let script = Script::from_hex(P2PKH_HEX).expect("valid hex should parse");
        assert_eq!(script.to_hex(), P2PKH_HEX);
        assert_eq!(script.len(), 25);
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Script::from_hex("ZZZZ").is_err());
    }

    #[test]
    fn test_to_asm_p2pkh() {
        let script = Script::from_hex(P2PKH_HEX).expect("valid hex should parse");
        assert_eq!(
            script.to_asm(),
            "OP_DUP OP_HASH160 e2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG"
        );
    }

    #[test]
    fn test_to_asm_truncated_is_empty() {
        let script = Script::from_bytes(&[OP_DUP, 0x05, 0x01]);
        assert_eq!(script.to_asm(), "");
    }

    /// ASM text parses back to the same bytes it was rendered from.
    #[test]
    fn test_hex_asm_roundtrip() {
        let script = Script::from_hex(P2PKH_HEX).expect("valid hex should parse");
        let again = Script::from_asm(&script.to_asm()).expect("roundtrip ASM should parse");
        assert_eq!(script, again);
    }

    #[test]
    fn test_from_asm_small_ints_and_aliases() {
        let script = Script::from_asm("OP_0 OP_TRUE 16 OP_NOP2").expect("valid ASM");
        assert_eq!(script.to_bytes(), &[OP_0, OP_1, 0x01, 0x16, OP_CHECKLOCKTIMEVERIFY]);
    }

    #[test]
    fn test_from_asm_rejects_garbage() {
        let err = Script::from_asm("OP_DUP nothex").expect_err("should reject");
        assert!(matches!(err, ScriptFormatError::InvalidAsmToken(t) if t == "nothex"));
    }

    /// Classification vector table: (hex, p2pkh, p2sh, data, push-only).
    #[test]
    fn test_classification() {
        let cases = [
            ("76a91403ececf2d12a7f614aef4c82ecf13c303bd9975d88ac", true, false, false, false),
            ("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb87", false, true, false, false),
            ("006a0401020304", false, false, true, false),
            ("6a0401020304", false, false, true, false),
            ("00515f4f0401020304", false, false, false, true),
            ("", false, false, false, true),
        ];
        for (h, p2pkh, p2sh, data, push_only) in cases {
            let s = Script::from_hex(h).expect("valid hex");
            assert_eq!(s.is_p2pkh(), p2pkh, "p2pkh for {}", h);
            assert_eq!(s.is_p2sh(), p2sh, "p2sh for {}", h);
            assert_eq!(s.is_data(), data, "data for {}", h);
            assert_eq!(s.is_push_only(), push_only, "push-only for {}", h);
        }
    }

    #[test]
    fn test_truncated_is_not_push_only() {
        assert!(!Script::from_bytes(&[0x05, 0x01]).is_push_only());
    }

    #[test]
    fn test_public_key_hash() {
        let script = Script::from_hex("76a91404d03f746652cfcb6cb55119ab473a045137d26588ac")
            .expect("valid hex");
        let pkh = script.public_key_hash().expect("should extract PKH");
        assert_eq!(hex::encode(pkh), "04d03f746652cfcb6cb55119ab473a045137d265");
    }

    #[test]
    fn test_public_key_hash_errors() {
        assert!(matches!(Script::new().public_key_hash(), Err(ScriptFormatError::EmptyScript)));
        assert!(matches!(
            Script::from_bytes(&[OP_DUP]).public_key_hash(),
            Err(ScriptFormatError::NotP2PKH)
        ));
    }

    #[test]
    fn test_to_p2sh_shape() {
        let redeem = Script::from_asm("OP_1").expect("valid ASM");
        let p2sh = redeem.to_p2sh();
        assert!(p2sh.is_p2sh());
        assert_eq!(&p2sh.to_bytes()[2..22], &hash160(&[OP_1])[..]);
    }

    #[test]
    fn test_append_push_data_sizes() {
        let mut script = Script::new();
        script.append_push_data(&[1, 2, 3, 4, 5]).expect("push should succeed");
        assert_eq!(script.to_hex(), "050102030405");

        let mut script = Script::new();
        script.append_push_data(&[0xAA; 80]).expect("push should succeed");
        assert_eq!(&script.to_hex()[..4], "4c50");

        let mut script = Script::new();
        script.append_push_data(&[0xBB; 256]).expect("push should succeed");
        assert_eq!(&script.to_hex()[..6], "4d0001");
    }

    #[test]
    fn test_append_opcodes_rejects_pushdata() {
        let mut script = Script::from_asm("OP_2 OP_2 OP_ADD").expect("valid ASM");
        assert!(script.append_opcodes(&[OP_EQUAL, OP_PUSHDATA1]).is_err());
        script.append_opcodes(&[OP_EQUAL, OP_VERIFY]).expect("should succeed");
        assert_eq!(script.to_asm(), "OP_2 OP_2 OP_ADD OP_EQUAL OP_VERIFY");
    }

    /// find_and_delete removes every canonical push of the target only.
    #[test]
    fn test_find_and_delete() {
        let cases = [
            ("0302ff030302ff03", "02ff03", ""),
            ("0302ff030302ff0351", "02ff03", "51"),
            ("02ff0302ff03", "02ff03", "02ff0302ff03"),
            ("4c0302ff03", "02ff03", "4c0302ff03"),
            ("ab0302ff03ab", "02ff03", "abab"),
            ("00", "", ""),
        ];
        for (script_hex, data_hex, expected) in cases {
            let script = Script::from_hex(script_hex).expect("valid hex");
            let data = hex::decode(data_hex).expect("valid hex");
            assert_eq!(
                script.find_and_delete(&data).to_hex(),
                expected,
                "find_and_delete({}, {})",
                script_hex,
                data_hex
            );
        }
    }

    #[test]
    fn test_remove_codeseparators() {
        let script = Script::from_asm("OP_CODESEPARATOR OP_1 OP_CODESEPARATOR ab OP_CODESEPARATOR")
            .expect("valid ASM");
        assert_eq!(script.remove_codeseparators().to_asm(), "OP_1 ab");
    }

    /// Editing helpers keep unparseable tails verbatim.
    #[test]
    fn test_edit_keeps_truncated_tail() {
        let script = Script::from_bytes(&[OP_CODESEPARATOR, 0x05, 0x01]);
        assert_eq!(script.remove_codeseparators().to_bytes(), &[0x05, 0x01]);
    }

    #[test]
    fn test_serde_hex() {
        let script = Script::from_hex(P2PKH_HEX).expect("valid hex");
        let json = serde_json::to_string(&script).expect("serialize");
        assert_eq!(json, format!("\"{}\"", P2PKH_HEX));
        let back: Script = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, script);
    }
}
