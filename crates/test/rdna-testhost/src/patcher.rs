//! Fake module loader holding module images in memory.

use std::collections::BTreeMap;

use rdna_host_api::{
    HostError, KernelPatcher, LookupPatch, ModuleId, ModuleInfo, ModuleLoad, PatchError,
};

const SLIDE_BASE: u64 = 0xFFFF_FF80_0000_0000;
const SLIDE_STRIDE: u64 = 0x100_0000;

/// Module loader that "loads" byte vectors and patches them in place.
#[derive(Debug, Default)]
pub struct FakePatcher {
    registered: Vec<&'static ModuleInfo>,
    images: BTreeMap<u64, Vec<u8>>,
    unregistered: usize,
    applied: Vec<(ModuleId, usize)>,
    routed: Vec<LookupPatch<'static>>,
    routing_calls: usize,
    refuse_routing: bool,
}

impl FakePatcher {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every shared-cache routing request fail.
    #[must_use]
    pub fn rejecting_shared_cache(mut self) -> Self {
        self.refuse_routing = true;
        self
    }

    /// Returns the identity assigned to `bundle_id`, if it was registered.
    pub fn id_of(&self, bundle_id: &str) -> Option<ModuleId> {
        self.registered
            .iter()
            .position(|m| m.bundle_id == bundle_id)
            .map(ModuleId)
    }

    /// Bundle identifiers in registration order.
    pub fn registered(&self) -> Vec<&'static str> {
        self.registered.iter().map(|m| m.bundle_id).collect()
    }

    /// Loads `image` as the registered module `bundle_id`.
    ///
    /// # Panics
    ///
    /// Panics if `bundle_id` was never registered.
    pub fn load(&mut self, bundle_id: &str, image: Vec<u8>) -> ModuleLoad {
        let id = self
            .id_of(bundle_id)
            .unwrap_or_else(|| panic!("{bundle_id} was not registered"));
        self.place(id, image)
    }

    /// Loads `image` under an identity nobody registered.
    pub fn load_unregistered(&mut self, image: Vec<u8>) -> ModuleLoad {
        self.unregistered += 1;
        self.place(ModuleId(usize::MAX - self.unregistered), image)
    }

    /// Returns the current bytes of a loaded image.
    pub fn image(&self, load: &ModuleLoad) -> &[u8] {
        self.images.get(&load.slide).map_or(&[][..], Vec::as_slice)
    }

    /// Every successful patch application as `(module, occurrences)`.
    pub fn applied(&self) -> &[(ModuleId, usize)] {
        &self.applied
    }

    /// Patches queued for the shared cache, in routing order.
    pub fn routed(&self) -> &[LookupPatch<'static>] {
        &self.routed
    }

    /// Number of shared-cache routing requests, including refused ones.
    pub fn routing_calls(&self) -> usize {
        self.routing_calls
    }

    /// Runs `page` through the routed patches as page validation would.
    ///
    /// Returns the occurrences rewritten.
    pub fn validate_page(&self, page: &mut [u8]) -> usize {
        self.routed
            .iter()
            .filter_map(|patch| rdna_lookup::apply(page, patch).ok())
            .sum()
    }

    fn place(&mut self, id: ModuleId, image: Vec<u8>) -> ModuleLoad {
        let slide = SLIDE_BASE + SLIDE_STRIDE * self.images.len() as u64;
        let load = ModuleLoad {
            id,
            slide,
            size: image.len(),
        };
        self.images.insert(slide, image);
        load
    }
}

impl KernelPatcher for FakePatcher {
    fn register_module(&mut self, info: &'static ModuleInfo) -> ModuleId {
        if let Some(id) = self.id_of(info.bundle_id) {
            return id;
        }
        self.registered.push(info);
        ModuleId(self.registered.len() - 1)
    }

    fn apply_lookup_patch(
        &mut self,
        load: &ModuleLoad,
        patch: &LookupPatch<'_>,
    ) -> Result<usize, PatchError> {
        let image = self
            .images
            .get_mut(&load.slide)
            .filter(|image| image.len() == load.size)
            .ok_or(PatchError::OutOfRange)?;
        let applied = rdna_lookup::apply(image, patch)?;
        self.applied.push((load.id, applied));
        Ok(applied)
    }

    fn route_shared_cache(&mut self, patches: &[LookupPatch<'static>]) -> Result<(), HostError> {
        self.routing_calls += 1;
        if self.refuse_routing {
            return Err(HostError::SharedCacheUnavailable);
        }
        self.routed.extend_from_slice(patches);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MODULE: ModuleInfo = ModuleInfo {
        bundle_id: "com.example.Module",
        paths: &[],
    };

    #[test]
    fn registration_is_stable() {
        let mut patcher = FakePatcher::new();
        let a = patcher.register_module(&MODULE);
        let b = patcher.register_module(&MODULE);
        assert_eq!(a, b);
        assert_eq!(patcher.registered(), vec!["com.example.Module"]);
    }

    #[test]
    fn patches_loaded_image() {
        let mut patcher = FakePatcher::new();
        patcher.register_module(&MODULE);
        let load = patcher.load("com.example.Module", b"..abc..".to_vec());
        let patch = LookupPatch::new(b"abc", b"xyz", 1);
        assert_eq!(patcher.apply_lookup_patch(&load, &patch), Ok(1));
        assert_eq!(patcher.image(&load), b"..xyz..");
        assert_eq!(patcher.applied(), &[(load.id, 1)]);
    }

    #[test]
    fn routed_patches_apply_to_validated_pages() {
        let mut patcher = FakePatcher::new();
        let patches = [LookupPatch::new(b"gfx1010", b"gfx1030", 0)];
        assert_eq!(patcher.route_shared_cache(&patches), Ok(()));

        let mut page = *b"gfx1010.gfx1010";
        assert_eq!(patcher.validate_page(&mut page), 2);
        assert_eq!(&page, b"gfx1030.gfx1030");
        assert_eq!(patcher.validate_page(&mut b"unrelated".to_vec()), 0);
    }

    #[test]
    fn refused_routing_keeps_nothing() {
        let mut patcher = FakePatcher::new().rejecting_shared_cache();
        let patches = [LookupPatch::new(b"a", b"b", 0)];
        assert_eq!(
            patcher.route_shared_cache(&patches),
            Err(HostError::SharedCacheUnavailable)
        );
        assert_eq!(patcher.routing_calls(), 1);
        assert!(patcher.routed().is_empty());
    }

    #[test]
    fn mismatched_size_is_out_of_range() {
        let mut patcher = FakePatcher::new();
        let mut load = patcher.load_unregistered(vec![0; 16]);
        load.size = 32;
        let patch = LookupPatch::new(&[0], &[1], 1);
        assert_eq!(
            patcher.apply_lookup_patch(&load, &patch),
            Err(PatchError::OutOfRange)
        );
    }
}
