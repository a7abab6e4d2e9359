//=========================================================================
// Scene Registry
//=========================================================================
//
// Maps each registered object to the surface(s) it is drawn with.
//
// Architecture:
//   SceneRegistry
//     └─ entries: Arena<SceneEntry>
//          SceneEntry { object: SharedObject, binding: SurfaceBinding }
//
// Object and binding live in one entry, so they are inserted and removed
// together. Insertion order is draw order: later entries paint over
// earlier ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::arena::{Arena, Handle};
use super::{SceneObject, SharedObject};
use crate::core::surface::Surface;

/// Handle to a registry entry. Stays valid until that entry is removed.
pub type ObjectHandle = Handle<SceneObject>;

//=== SurfaceBinding ======================================================

/// Surface(s) an entry is drawn with.
#[derive(Debug, Clone)]
pub enum SurfaceBinding {
    /// Static and text objects: one pre-decoded image.
    Single(Surface),

    /// Animated objects: whatever animation the object carries at draw
    /// time, at its current frame.
    Animated,
}

//=== SceneEntry ==========================================================

/// One registered object with its surface binding.
#[derive(Debug, Clone)]
pub struct SceneEntry {
    object: SharedObject,
    binding: SurfaceBinding,
}

impl SceneEntry {
    pub fn object(&self) -> &SharedObject {
        &self.object
    }

    pub fn binding(&self) -> &SurfaceBinding {
        &self.binding
    }

    /// Surface to draw this frame.
    ///
    /// Animated entries read the object's animation on every call, so the
    /// result tracks `advance()`/`set_frame()` and a replaced animation.
    /// Returns `None` when that frame failed to decode.
    pub fn resolve(&self) -> Option<Surface> {
        match &self.binding {
            SurfaceBinding::Single(surface) => Some(surface.clone()),
            SurfaceBinding::Animated => self
                .object
                .borrow()
                .animation()?
                .current_surface()
                .cloned(),
        }
    }
}

//=== SceneRegistry =======================================================

/// Ordered set of drawable scene objects.
///
/// The same object may be registered several times; each registration is
/// a separate entry with its own handle.
pub struct SceneRegistry {
    entries: Arena<SceneEntry, SceneObject>,
}

impl SceneRegistry {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            entries: Arena::new(),
        }
    }

    //--- Insertion --------------------------------------------------------

    /// Registers an object drawn with a single surface.
    pub fn add_static(&mut self, object: SharedObject, surface: Surface) -> ObjectHandle {
        let handle = self.entries.insert(SceneEntry {
            object,
            binding: SurfaceBinding::Single(surface),
        });
        debug!(target: "scene", "Registered static object {:?}", handle);
        handle
    }

    /// Registers an animated object, bound to its animation.
    ///
    /// Returns `None` if the object has no animation.
    pub fn add_animated(&mut self, object: SharedObject) -> Option<ObjectHandle> {
        let frame_count = object.borrow().animation()?.frame_count();
        let handle = self.entries.insert(SceneEntry {
            object,
            binding: SurfaceBinding::Animated,
        });

        if frame_count == 0 {
            warn!(target: "scene", "Animated object {:?} has no frames and will not be drawn", handle);
        }
        debug!(target: "scene", "Registered animated object {:?}", handle);
        Some(handle)
    }

    //--- Removal ----------------------------------------------------------

    /// Removes one entry. Returns `false` for stale handles.
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        let removed = self.entries.remove(handle).is_some();
        if !removed {
            warn!(target: "scene", "Ignoring removal of stale object handle {:?}", handle);
        }
        removed
    }

    /// Removes the entry at draw-order `position`. Returns `false` when out of range.
    pub fn remove_at(&mut self, position: usize) -> bool {
        self.entries.remove_at(position).is_some()
    }

    /// Removes every entry registered for `object`. Returns how many were removed.
    pub fn remove_object(&mut self, object: &SharedObject) -> usize {
        let removed = self
            .entries
            .remove_where(|entry| Rc::ptr_eq(&entry.object, object));
        debug!(target: "scene", "Removed {} entries for object", removed);
        removed
    }

    /// Drops all entries. The objects themselves stay with their owners.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    //--- Queries ----------------------------------------------------------

    /// Surface to draw for `handle` this frame. `None` for stale handles
    /// and for animation frames that failed to decode.
    pub fn resolve_frame(&self, handle: ObjectHandle) -> Option<Surface> {
        self.entries.get(handle)?.resolve()
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&SceneEntry> {
        self.entries.get(handle)
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.entries.contains(handle)
    }

    /// Handle of the entry currently at draw-order `position`.
    pub fn handle_at(&self, position: usize) -> Option<ObjectHandle> {
        self.entries.handle_at(position)
    }

    /// Entries in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &SceneEntry)> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::animation::Animation;
    use crate::core::surface::Color;

    //--- Test Helpers -----------------------------------------------------

    fn static_object() -> SharedObject {
        SceneObject::new_static(0, 0, "tile.png").into_shared()
    }

    fn animated_object(frames: Vec<Option<Surface>>) -> SharedObject {
        SceneObject::new_animated(0, 0, Animation::from_frames(frames)).into_shared()
    }

    fn surface(shade: u8) -> Surface {
        Surface::solid(1, 1, Color::new(shade, shade, shade))
    }

    //=====================================================================
    // Insertion
    //=====================================================================

    #[test]
    fn add_static_resolves_to_given_surface() {
        let mut registry = SceneRegistry::new();
        let tile = surface(1);
        let handle = registry.add_static(static_object(), tile.clone());

        assert_eq!(registry.len(), 1);
        assert!(Surface::ptr_eq(&registry.resolve_frame(handle).unwrap(), &tile));
    }

    #[test]
    fn add_animated_binds_to_animation() {
        let mut registry = SceneRegistry::new();
        let object = animated_object(vec![Some(surface(1)), Some(surface(2))]);
        let handle = registry.add_animated(Rc::clone(&object)).unwrap();

        assert!(matches!(
            registry.get(handle).unwrap().binding(),
            SurfaceBinding::Animated
        ));
    }

    #[test]
    fn add_animated_accepts_empty_animation() {
        let mut registry = SceneRegistry::new();
        let handle = registry.add_animated(animated_object(Vec::new())).unwrap();
        assert!(registry.resolve_frame(handle).is_none());
    }

    #[test]
    fn add_animated_rejects_static_object() {
        let mut registry = SceneRegistry::new();
        assert!(registry.add_animated(static_object()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn insertion_order_is_draw_order() {
        let mut registry = SceneRegistry::new();
        let a = registry.add_static(static_object(), surface(1));
        let b = registry.add_static(static_object(), surface(2));
        let c = registry.add_static(static_object(), surface(3));

        let order: Vec<ObjectHandle> = registry.iter().map(|(h, _)| h).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    //=====================================================================
    // Frame Resolution
    //=====================================================================

    #[test]
    fn resolve_follows_animation_state() {
        let mut registry = SceneRegistry::new();
        let first = surface(10);
        let second = surface(20);
        let object = animated_object(vec![Some(first.clone()), Some(second.clone())]);
        let handle = registry.add_animated(Rc::clone(&object)).unwrap();

        assert!(Surface::ptr_eq(&registry.resolve_frame(handle).unwrap(), &first));

        object.borrow_mut().animation_mut().unwrap().advance().unwrap();
        assert!(Surface::ptr_eq(&registry.resolve_frame(handle).unwrap(), &second));

        object.borrow_mut().animation_mut().unwrap().advance().unwrap();
        assert!(Surface::ptr_eq(&registry.resolve_frame(handle).unwrap(), &first));
    }

    #[test]
    fn resolve_follows_replaced_animation() {
        let mut registry = SceneRegistry::new();
        let walk_left = surface(1);
        let object = animated_object(vec![Some(walk_left.clone()), Some(surface(2))]);
        let handle = registry.add_animated(Rc::clone(&object)).unwrap();
        object.borrow_mut().animation_mut().unwrap().set_frame(1).unwrap();

        let walk_right = surface(30);
        *object.borrow_mut().animation_mut().unwrap() =
            Animation::from_frames(vec![Some(walk_right.clone())]);

        let drawn = registry.resolve_frame(handle).unwrap();
        assert!(Surface::ptr_eq(&drawn, &walk_right), "Entry must draw the new animation");
        assert!(!Surface::ptr_eq(&drawn, &walk_left));
    }

    #[test]
    fn resolve_absent_frame_is_none() {
        let mut registry = SceneRegistry::new();
        let object = animated_object(vec![Some(surface(1)), None]);
        let handle = registry.add_animated(Rc::clone(&object)).unwrap();

        object.borrow_mut().animation_mut().unwrap().set_frame(1).unwrap();
        assert!(registry.resolve_frame(handle).is_none());
    }

    #[test]
    fn resolve_stale_handle_is_none() {
        let mut registry = SceneRegistry::new();
        let handle = registry.add_static(static_object(), surface(1));
        registry.remove(handle);
        assert!(registry.resolve_frame(handle).is_none());
    }

    //=====================================================================
    // Removal
    //=====================================================================

    #[test]
    fn remove_by_handle_keeps_other_handles_valid() {
        let mut registry = SceneRegistry::new();
        let a = registry.add_static(static_object(), surface(1));
        let b_surface = surface(2);
        let b = registry.add_static(static_object(), b_surface.clone());

        assert!(registry.remove(a));
        assert_eq!(registry.len(), 1);
        assert!(Surface::ptr_eq(&registry.resolve_frame(b).unwrap(), &b_surface));
    }

    #[test]
    fn remove_stale_handle_returns_false() {
        let mut registry = SceneRegistry::new();
        let a = registry.add_static(static_object(), surface(1));
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
    }

    #[test]
    fn stale_handle_does_not_hit_reused_slot() {
        let mut registry = SceneRegistry::new();
        let old = registry.add_static(static_object(), surface(1));
        registry.remove(old);
        let new = registry.add_static(static_object(), surface(2));

        assert!(!registry.remove(old), "Stale handle must not remove the new entry");
        assert!(registry.contains(new));
    }

    #[test]
    fn remove_at_out_of_range_is_noop() {
        let mut registry = SceneRegistry::new();
        registry.add_static(static_object(), surface(1));
        assert!(!registry.remove_at(1));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove_at(0));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_object_removes_every_registration() {
        let mut registry = SceneRegistry::new();
        let twice = static_object();
        let other = static_object();

        registry.add_static(Rc::clone(&twice), surface(1));
        let kept = registry.add_static(Rc::clone(&other), surface(2));
        registry.add_static(Rc::clone(&twice), surface(3));

        assert_eq!(registry.remove_object(&twice), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(kept));
        assert!(registry.iter().all(|(_, e)| !Rc::ptr_eq(e.object(), &twice)));
    }

    #[test]
    fn remove_object_not_registered_removes_nothing() {
        let mut registry = SceneRegistry::new();
        registry.add_static(static_object(), surface(1));
        assert_eq!(registry.remove_object(&static_object()), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_keeps_objects_alive() {
        let mut registry = SceneRegistry::new();
        let object = static_object();
        let handle = registry.add_static(Rc::clone(&object), surface(1));

        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.contains(handle));
        assert_eq!(Rc::strong_count(&object), 1, "Only the caller's reference remains");
    }

    #[test]
    fn every_entry_has_a_binding_after_mixed_operations() {
        let mut registry = SceneRegistry::new();
        let shared = static_object();
        let a = registry.add_static(Rc::clone(&shared), surface(1));
        registry.add_animated(animated_object(vec![Some(surface(2))])).unwrap();
        registry.add_static(Rc::clone(&shared), surface(3));
        registry.remove(a);
        registry.add_static(static_object(), surface(4));
        registry.remove_at(0);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().count(), registry.len());
        for (handle, _) in registry.iter() {
            assert!(registry.resolve_frame(handle).is_some());
        }
    }
}
