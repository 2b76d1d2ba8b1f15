//! Per-rule mapping flags

use std::fmt;

/// A named switch altering how one mapping rule resolves and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// A source path that cannot be resolved counts as blank (not written)
    BlankIfMissing,
    /// Write the (formatted) source text itself instead of resolving it
    ForceLiteral,
    /// Expanded elements without a parent element are skipped
    RequireParent,
    /// Skip parent-less elements without a warning
    FailSilent,
    /// Fill destination placeholders with element indices, not values
    DestUseIndex,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flag::BlankIfMissing => "blank-if-missing",
            Flag::ForceLiteral => "force-literal",
            Flag::RequireParent => "require-parent",
            Flag::FailSilent => "fail-silent",
            Flag::DestUseIndex => "dest-use-index",
        };
        write!(f, "{}", name)
    }
}

/// The active flag state while one rule runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSet {
    /// See [`Flag::BlankIfMissing`]
    pub blank_if_missing: bool,
    /// See [`Flag::ForceLiteral`]
    pub force_literal: bool,
    /// See [`Flag::RequireParent`]
    pub require_parent: bool,
    /// See [`Flag::FailSilent`]
    pub fail_silent: bool,
    /// See [`Flag::DestUseIndex`]
    pub dest_use_index: bool,
}

impl FlagSet {
    /// Create a flag set with every switch off
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flag set from a list of flags
    pub fn from_flags(flags: &[Flag]) -> Self {
        let mut set = Self::new();
        set.apply(flags);
        set
    }

    /// Turn every switch off
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Turn on the given flags
    pub fn apply(&mut self, flags: &[Flag]) {
        for flag in flags {
            self.set(*flag);
        }
    }

    /// Turn on one flag
    pub fn set(&mut self, flag: Flag) {
        match flag {
            Flag::BlankIfMissing => self.blank_if_missing = true,
            Flag::ForceLiteral => self.force_literal = true,
            Flag::RequireParent => self.require_parent = true,
            Flag::FailSilent => self.fail_silent = true,
            Flag::DestUseIndex => self.dest_use_index = true,
        }
    }

    /// Check whether a flag is on
    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::BlankIfMissing => self.blank_if_missing,
            Flag::ForceLiteral => self.force_literal,
            Flag::RequireParent => self.require_parent,
            Flag::FailSilent => self.fail_silent,
            Flag::DestUseIndex => self.dest_use_index,
        }
    }
}
