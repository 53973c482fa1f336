//! Provides common crate utilities.

pub(crate) mod hash;
