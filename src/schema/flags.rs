//! Rule flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of behavior flags attached to a rule.
///
/// In rule files flags are written as a list of names:
/// `"flags": ["required", "not_empty"]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Flag>", into = "Vec<Flag>")]
pub struct Flags(u16);

/// A single named flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    Required,
    NotEmpty,
    AllowNull,
    Normalize,
    AllowCount,
    AllowUserMacro,
    AllowLldMacro,
    RequiredLldMacro,
    AllowUnexpected,
    AllowMacro,
    PreserveKeys,
}

const ALL: [Flag; 11] = [
    Flag::Required,
    Flag::NotEmpty,
    Flag::AllowNull,
    Flag::Normalize,
    Flag::AllowCount,
    Flag::AllowUserMacro,
    Flag::AllowLldMacro,
    Flag::RequiredLldMacro,
    Flag::AllowUnexpected,
    Flag::AllowMacro,
    Flag::PreserveKeys,
];

impl Flag {
    fn bit(self) -> u16 {
        match self {
            Self::Required => 0x0001,
            Self::NotEmpty => 0x0002,
            Self::AllowNull => 0x0004,
            Self::Normalize => 0x0008,
            Self::AllowCount => 0x0010,
            Self::AllowUserMacro => 0x0020,
            Self::AllowLldMacro => 0x0040,
            Self::RequiredLldMacro => 0x0080,
            Self::AllowUnexpected => 0x0100,
            Self::AllowMacro => 0x0200,
            Self::PreserveKeys => 0x0400,
        }
    }
}

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Field must be present in its object
    pub const REQUIRED: Flags = Flags(0x0001);
    /// Empty string or empty array is rejected
    pub const NOT_EMPTY: Flags = Flags(0x0002);
    /// Null is accepted as is
    pub const ALLOW_NULL: Flags = Flags(0x0004);
    /// A bare scalar (or object) is wrapped into a one-element array
    pub const NORMALIZE: Flags = Flags(0x0008);
    /// `output` also accepts `extend,count`
    pub const ALLOW_COUNT: Flags = Flags(0x0010);
    pub const ALLOW_USER_MACRO: Flags = Flags(0x0020);
    pub const ALLOW_LLD_MACRO: Flags = Flags(0x0040);
    /// Name must contain at least one LLD macro
    pub const REQUIRED_LLD_MACRO: Flags = Flags(0x0080);
    /// Object keys without a field rule are kept instead of rejected
    pub const ALLOW_UNEXPECTED: Flags = Flags(0x0100);
    /// Host macros such as `{HOST.IP}` are accepted by address rules
    pub const ALLOW_MACRO: Flags = Flags(0x0200);
    /// Object arrays keep the keys of their input instead of re-indexing
    pub const PRESERVE_KEYS: Flags = Flags(0x0400);

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Only the flags present in both sets.
    pub fn intersect(self, other: Flags) -> Flags {
        Flags(self.0 & other.0)
    }

    pub fn bits(self) -> u16 {
        self.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags(flag.bit())
    }
}

impl From<Vec<Flag>> for Flags {
    fn from(flags: Vec<Flag>) -> Self {
        Flags(flags.into_iter().fold(0, |bits, flag| bits | flag.bit()))
    }
}

impl From<Flags> for Vec<Flag> {
    fn from(flags: Flags) -> Self {
        ALL.into_iter()
            .filter(|flag| flags.0 & flag.bit() != 0)
            .collect()
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Vec::<Flag>::from(*self))
            .finish()
    }
}
