//! Byte-pattern lookup-and-replace for loaded module images.
//!
//! A [`LookupPatch`] describes one substitution inside a foreign module: the
//! bytes to look for, the bytes to write in their place, how many
//! occurrences to rewrite, and how many leading occurrences to leave alone.
//! [`apply`] performs the substitution on an in-memory image and reports how
//! many occurrences were rewritten.
//!
//! The engine is literal: no masks, no wildcards, no relocation.
//! Patterns and replacements must have the same length so that offsets inside
//! the module never shift.

#![cfg_attr(not(test), no_std)]

use core::fmt;

/// A single find-and-replace substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupPatch<'a> {
    /// Bytes to search for.
    pub find: &'a [u8],
    /// Bytes written over each matched occurrence.
    pub replace: &'a [u8],
    /// Number of occurrences to rewrite (0 = every occurrence).
    pub count: usize,
    /// Number of leading occurrences to skip before rewriting.
    pub skip: usize,
}

impl<'a> LookupPatch<'a> {
    /// Creates a patch rewriting exactly `count` occurrences of `find`.
    #[must_use]
    pub const fn new(find: &'a [u8], replace: &'a [u8], count: usize) -> Self {
        Self {
            find,
            replace,
            count,
            skip: 0,
        }
    }

    /// Returns the same patch, skipping the first `skip` occurrences.
    #[must_use]
    pub const fn skipping(self, skip: usize) -> Self {
        Self { skip, ..self }
    }

    /// Checks the patch is well formed without touching any image.
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.find.is_empty() {
            return Err(PatchError::EmptyPattern);
        }
        if self.find.len() != self.replace.len() {
            return Err(PatchError::LengthMismatch {
                find: self.find.len(),
                replace: self.replace.len(),
            });
        }
        Ok(())
    }
}

/// Errors produced while applying a [`LookupPatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// The search pattern is empty.
    EmptyPattern,
    /// Pattern and replacement lengths differ.
    LengthMismatch {
        /// Length of the search pattern.
        find: usize,
        /// Length of the replacement.
        replace: usize,
    },
    /// No occurrence (after skipping) was found in the image.
    NotFound,
    /// The module range does not describe memory the patcher can reach.
    OutOfRange,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern => f.write_str("empty search pattern"),
            Self::LengthMismatch { find, replace } => write!(
                f,
                "pattern is {find} bytes but replacement is {replace} bytes"
            ),
            Self::NotFound => f.write_str("pattern not found"),
            Self::OutOfRange => f.write_str("module range is not mapped"),
        }
    }
}

impl core::error::Error for PatchError {}

/// Applies `patch` to `image` in place.
///
/// Returns the number of occurrences rewritten. Fails with
/// [`PatchError::NotFound`] when nothing was rewritten; the image is left
/// untouched in every error case.
pub fn apply(image: &mut [u8], patch: &LookupPatch<'_>) -> Result<usize, PatchError> {
    patch.validate()?;

    let limit = if patch.count == 0 {
        usize::MAX
    } else {
        patch.count
    };

    let len = patch.find.len();
    let mut applied = 0;
    let mut seen = 0;
    let mut pos = 0;
    while applied < limit && pos + len <= image.len() {
        if &image[pos..pos + len] != patch.find {
            pos += 1;
            continue;
        }
        if seen < patch.skip {
            seen += 1;
        } else {
            image[pos..pos + len].copy_from_slice(patch.replace);
            applied += 1;
        }
        pos += len;
    }

    if applied == 0 {
        return Err(PatchError::NotFound);
    }
    Ok(applied)
}
