//! Script verification flags (bitmask).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Script verification flags controlling evaluator behavior.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    /// No checks beyond consensus evaluation.
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// Evaluate P2SH redeem scripts.
    pub const VERIFY_P2SH: ScriptFlags = ScriptFlags(1 << 0);
    /// Enforce strict signature, hash type and public key encodings.
    pub const VERIFY_STRICTENC: ScriptFlags = ScriptFlags(1 << 1);
    /// Enforce strict DER signatures.
    pub const VERIFY_DERSIG: ScriptFlags = ScriptFlags(1 << 2);
    /// Reject signatures whose S is above half the curve order.
    pub const VERIFY_LOW_S: ScriptFlags = ScriptFlags(1 << 3);
    /// The CHECKMULTISIG dummy element must be empty.
    pub const VERIFY_NULLDUMMY: ScriptFlags = ScriptFlags(1 << 4);
    /// The signature script must be push-only.
    pub const VERIFY_SIGPUSHONLY: ScriptFlags = ScriptFlags(1 << 5);
    /// Pushes and numeric operands must be minimally encoded.
    pub const VERIFY_MINIMALDATA: ScriptFlags = ScriptFlags(1 << 6);
    /// Fail on NOP1 and NOP4..NOP10.
    pub const VERIFY_DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 7);
    /// Exactly one element must remain after evaluation. Requires `VERIFY_P2SH`.
    pub const VERIFY_CLEANSTACK: ScriptFlags = ScriptFlags(1 << 8);
    /// Treat OP_CHECKLOCKTIMEVERIFY as BIP65 instead of a NOP.
    pub const VERIFY_CHECKLOCKTIMEVERIFY: ScriptFlags = ScriptFlags(1 << 9);
    /// Treat OP_CHECKSEQUENCEVERIFY as BIP112 instead of a NOP.
    pub const VERIFY_CHECKSEQUENCEVERIFY: ScriptFlags = ScriptFlags(1 << 10);
    /// IF/NOTIF operands must be empty or exactly `0x01`.
    pub const VERIFY_MINIMALIF: ScriptFlags = ScriptFlags(1 << 11);
    /// Failed signature checks require empty signatures.
    pub const VERIFY_NULLFAIL: ScriptFlags = ScriptFlags(1 << 12);
    /// Public keys must be compressed.
    pub const VERIFY_COMPRESSED_PUBKEYTYPE: ScriptFlags = ScriptFlags(1 << 13);
    /// Signatures carrying the fork id use the fork-id digest.
    pub const ENABLE_SIGHASH_FORKID: ScriptFlags = ScriptFlags(1 << 14);

    /// Flags every valid block must satisfy after the fork-id activation.
    pub const MANDATORY: ScriptFlags = ScriptFlags(
        Self::VERIFY_P2SH.0 | Self::VERIFY_STRICTENC.0 | Self::ENABLE_SIGHASH_FORKID.0,
    );

    /// Flags applied to relayed transactions.
    pub const STANDARD: ScriptFlags = ScriptFlags(
        Self::MANDATORY.0
            | Self::VERIFY_DERSIG.0
            | Self::VERIFY_LOW_S.0
            | Self::VERIFY_NULLDUMMY.0
            | Self::VERIFY_SIGPUSHONLY.0
            | Self::VERIFY_MINIMALDATA.0
            | Self::VERIFY_DISCOURAGE_UPGRADABLE_NOPS.0
            | Self::VERIFY_CLEANSTACK.0
            | Self::VERIFY_CHECKLOCKTIMEVERIFY.0
            | Self::VERIFY_CHECKSEQUENCEVERIFY.0
            | Self::VERIFY_NULLFAIL.0,
    );

    /// Whether every bit of `flag` is set.
    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Whether at least one of `flags` is set.
    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }

    /// Set the bits of `flag`.
    pub fn add_flag(&mut self, flag: ScriptFlags) {
        self.0 |= flag.0;
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}

const NAMES: [(ScriptFlags, &str); 15] = [
    (ScriptFlags::VERIFY_P2SH, "P2SH"),
    (ScriptFlags::VERIFY_STRICTENC, "STRICTENC"),
    (ScriptFlags::VERIFY_DERSIG, "DERSIG"),
    (ScriptFlags::VERIFY_LOW_S, "LOW_S"),
    (ScriptFlags::VERIFY_NULLDUMMY, "NULLDUMMY"),
    (ScriptFlags::VERIFY_SIGPUSHONLY, "SIGPUSHONLY"),
    (ScriptFlags::VERIFY_MINIMALDATA, "MINIMALDATA"),
    (ScriptFlags::VERIFY_DISCOURAGE_UPGRADABLE_NOPS, "DISCOURAGE_UPGRADABLE_NOPS"),
    (ScriptFlags::VERIFY_CLEANSTACK, "CLEANSTACK"),
    (ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY, "CHECKLOCKTIMEVERIFY"),
    (ScriptFlags::VERIFY_CHECKSEQUENCEVERIFY, "CHECKSEQUENCEVERIFY"),
    (ScriptFlags::VERIFY_MINIMALIF, "MINIMALIF"),
    (ScriptFlags::VERIFY_NULLFAIL, "NULLFAIL"),
    (ScriptFlags::VERIFY_COMPRESSED_PUBKEYTYPE, "COMPRESSED_PUBKEYTYPE"),
    (ScriptFlags::ENABLE_SIGHASH_FORKID, "SIGHASH_FORKID"),
];

impl ScriptFlags {
    /// Parse a comma-separated list of flag names such as `"P2SH,STRICTENC"`.
    ///
    /// Returns `None` if any name is unknown. An empty string yields `NONE`.
    pub fn from_names(list: &str) -> Option<ScriptFlags> {
        let mut flags = ScriptFlags::NONE;
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (flag, _) = NAMES.iter().find(|(_, n)| *n == name)?;
            flags |= *flag;
        }
        Some(flags)
    }
}

impl fmt::Debug for ScriptFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.has_flag(*flag))
            .map(|(_, n)| *n)
            .collect();
        write!(f, "ScriptFlags({})", names.join(","))
    }
}
