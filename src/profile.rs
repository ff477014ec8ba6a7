//! Profile Registry - compiled-in capability sets.
//!
//! A profile names the set of opcodes a document may contain. Documents
//! declare their profile in the header; the player runs under its own
//! runtime profile and accepts a document only when every opcode the
//! document's profile allows is also allowed by the runtime profile.
//!
//! # Table
//!
//! | id | name | api | opcodes |
//! |----|------|-----|---------|
//! | 0  | core | 1   | data, layout, modifiers (no border), integer change |
//! | 1  | core | 2   | core@1 + expressions, border, remaining value changes |
//! | 2  | host | 2   | core@1 + named variables, host actions |
//! | 3  | core | 3   | everything |
//!
//! # Example
//!
//! ```
//! use spark_remote::profile::ProfileRegistry;
//!
//! let registry = ProfileRegistry::builtin();
//! let core = registry.profile_for(2, "core").unwrap();
//! assert_eq!(core.api_level, 2);
//! assert!(registry.by_id(3).unwrap().accepts(core));
//! ```

use crate::codec::opcode as op;

// =============================================================================
// Opcode Set
// =============================================================================

/// 256-bit opcode bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OpcodeSet([u64; 4]);

impl OpcodeSet {
    pub const EMPTY: Self = Self([0; 4]);

    pub const fn with(self, opcode: u8) -> Self {
        let mut words = self.0;
        words[(opcode >> 6) as usize] |= 1u64 << (opcode & 63);
        Self(words)
    }

    pub const fn with_all(self, opcodes: &[u8]) -> Self {
        let mut set = self;
        let mut i = 0;
        while i < opcodes.len() {
            set = set.with(opcodes[i]);
            i += 1;
        }
        set
    }

    pub const fn union(self, other: Self) -> Self {
        Self([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    #[inline]
    pub const fn contains(&self, opcode: u8) -> bool {
        self.0[(opcode >> 6) as usize] & (1u64 << (opcode & 63)) != 0
    }

    /// Every opcode in `other` is also in `self`.
    pub const fn is_superset(&self, other: &Self) -> bool {
        let mut i = 0;
        while i < 4 {
            if other.0[i] & !self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|&opcode| self.contains(opcode))
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0; 4]
    }
}

// =============================================================================
// Profiles
// =============================================================================

/// A named, versioned set of allowed opcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: u16,
    pub name: &'static str,
    pub api_level: u16,
    pub opcodes: OpcodeSet,
}

impl Profile {
    #[inline]
    pub const fn allows(&self, opcode: u8) -> bool {
        self.opcodes.contains(opcode)
    }

    /// Whether a document written against `other` can run under `self`.
    ///
    /// Containment of opcode sets, not a comparison of levels.
    pub const fn accepts(&self, other: &Profile) -> bool {
        self.opcodes.is_superset(&other.opcodes)
    }
}

const CORE_1_OPS: OpcodeSet = OpcodeSet::EMPTY.with_all(&[
    op::INTEGER_VALUE,
    op::FLOAT_VALUE,
    op::TEXT_DATA,
    op::COLOR_VALUE,
    op::LIST_VALUE,
    op::ROW_START,
    op::COLUMN_START,
    op::BOX_START,
    op::TEXT,
    op::SPACER,
    op::CONTAINER_END,
    op::WIDTH,
    op::HEIGHT,
    op::PADDING,
    op::BACKGROUND,
    op::VISIBILITY,
    op::TOUCH_ACTION,
    op::VALUE_INTEGER_CHANGE,
]);

const CORE_2_OPS: OpcodeSet = CORE_1_OPS.with_all(&[
    op::INTEGER_EXPRESSION,
    op::FLOAT_EXPRESSION,
    op::TEXT_LOOKUP,
    op::TEXT_FROM_NUMBER,
    op::BORDER,
    op::VALUE_FLOAT_CHANGE,
    op::VALUE_STRING_CHANGE,
    op::VALUE_INTEGER_EXPRESSION_CHANGE,
]);

const HOST_2_OPS: OpcodeSet = CORE_1_OPS.with_all(&[op::NAMED_VARIABLE, op::HOST_ACTION]);

const CORE_3_OPS: OpcodeSet = CORE_2_OPS.union(HOST_2_OPS);

pub static CORE_V1: Profile = Profile {
    id: 0,
    name: "core",
    api_level: 1,
    opcodes: CORE_1_OPS,
};

pub static CORE_V2: Profile = Profile {
    id: 1,
    name: "core",
    api_level: 2,
    opcodes: CORE_2_OPS,
};

pub static HOST_V2: Profile = Profile {
    id: 2,
    name: "host",
    api_level: 2,
    opcodes: HOST_2_OPS,
};

pub static CORE_V3: Profile = Profile {
    id: 3,
    name: "core",
    api_level: 3,
    opcodes: CORE_3_OPS,
};

static BUILTIN: [&Profile; 4] = [&CORE_V1, &CORE_V2, &HOST_V2, &CORE_V3];

// =============================================================================
// Registry
// =============================================================================

/// Read-only lookup over a fixed profile table.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRegistry {
    profiles: &'static [&'static Profile],
}

impl ProfileRegistry {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        Self { profiles: &BUILTIN }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Profile> + '_ {
        self.profiles.iter().copied()
    }

    pub fn by_id(&self, id: u16) -> Option<&'static Profile> {
        self.iter().find(|p| p.id == id)
    }

    /// Newest profile called `name` whose api level is at most `api_level`.
    pub fn profile_for(&self, api_level: u16, name: &str) -> Option<&'static Profile> {
        self.iter()
            .filter(|p| p.name == name && p.api_level <= api_level)
            .max_by_key(|p| p.api_level)
    }

    pub fn max_api_level(&self) -> u16 {
        self.iter().map(|p| p.api_level).max().unwrap_or(0)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
