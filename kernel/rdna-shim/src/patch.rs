//! Applying patch tables to a loaded module.
//!
//! A pass either applies every descriptor the expected number of times or
//! fails with the first descriptor that did not. Patches already written
//! before a failure stay written; the boot halts anyway.

use log::debug;
use rdna_host_api::{KernelPatcher, LookupPatch, ModuleLoad};

use crate::chip::ChipType;
use crate::config::GatedPatch;
use crate::error::Fatal;

/// Applies `patches` in order to the image described by `load`.
///
/// A patch with a non-zero `count` must rewrite exactly that many
/// occurrences. Returns the total number of occurrences rewritten.
pub fn apply_all(
    patcher: &mut dyn KernelPatcher,
    module: &'static str,
    load: &ModuleLoad,
    patches: &[LookupPatch<'_>],
) -> Result<usize, Fatal> {
    let mut total = 0;
    for (index, patch) in patches.iter().enumerate() {
        let applied = patcher
            .apply_lookup_patch(load, patch)
            .map_err(|source| Fatal::Patch {
                module,
                index,
                source,
            })?;
        if patch.count != 0 && applied != patch.count {
            return Err(Fatal::PatchCount {
                module,
                index,
                applied,
                expected: patch.count,
            });
        }
        debug!(target: "rdna::patch", "{module}: patch {index} applied {applied}x");
        total += applied;
    }
    Ok(total)
}

/// Applies the entries of `table` that cover `chip`.
///
/// Indices in diagnostics refer to positions in `table`.
pub fn apply_gated(
    patcher: &mut dyn KernelPatcher,
    module: &'static str,
    load: &ModuleLoad,
    chip: ChipType,
    table: &[GatedPatch],
) -> Result<usize, Fatal> {
    let mut total = 0;
    for (index, gated) in table.iter().enumerate() {
        if !gated.applies_to(chip) {
            continue;
        }
        total += apply_all(patcher, module, load, core::slice::from_ref(&gated.patch))
            .map_err(|fatal| reindex(fatal, index))?;
    }
    Ok(total)
}

fn reindex(fatal: Fatal, index: usize) -> Fatal {
    match fatal {
        Fatal::Patch { module, source, .. } => Fatal::Patch {
            module,
            index,
            source,
        },
        Fatal::PatchCount {
            module,
            applied,
            expected,
            ..
        } => Fatal::PatchCount {
            module,
            index,
            applied,
            expected,
        },
        other => other,
    }
}
