//=========================================================================
// Generational Arena
//=========================================================================
//
// Slot storage with generation-checked handles and a separate draw order.
//
// Architecture:
//   slots: Vec<Slot<T>>   (index → generation + value)
//   free:  Vec<u32>       (reusable slot indices)
//   order: Vec<u32>       (slot indices in insertion order)
//
// Removing an entry bumps its slot's generation, so a handle kept past
// removal resolves to nothing instead of to whatever reused the slot.
// Positions in `order` shift on removal; handles never do.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

//=== Handle ==============================================================

/// Generation-indexed reference to an arena entry.
///
/// The type parameter only tags which arena a handle belongs to, so a
/// widget handle cannot be passed where an object handle is expected.
pub struct Handle<T: ?Sized> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Handle<T> {
    fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index (reused after removal).
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time the handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would require `T: Clone`, `T: Eq`... on the tag.
impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Handle<T> {}

impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

//=== Arena ===============================================================

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Ordered storage addressed by [`Handle`]s.
pub(crate) struct Arena<T, Tag: ?Sized = T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<u32>,
    _tag: PhantomData<fn(&Tag)>,
}

impl<T, Tag: ?Sized> Arena<T, Tag> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            _tag: PhantomData,
        }
    }

    //--- Insertion --------------------------------------------------------

    /// Appends `value` at the end of the order and returns its handle.
    pub(crate) fn insert(&mut self, value: T) -> Handle<Tag> {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].value = Some(value);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                (self.slots.len() - 1) as u32
            }
        };

        self.order.push(index);
        Handle::new(index, self.slots[index as usize].generation)
    }

    //--- Removal ----------------------------------------------------------

    /// Removes the entry behind `handle`. Stale handles return `None`.
    pub(crate) fn remove(&mut self, handle: Handle<Tag>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }

        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.order.retain(|&index| index != handle.index);
        value
    }

    /// Removes the entry at draw-order `position`.
    pub(crate) fn remove_at(&mut self, position: usize) -> Option<T> {
        let handle = self.handle_at(position)?;
        self.remove(handle)
    }

    /// Removes every entry matching `predicate`, keeping the order of the
    /// rest. Returns how many entries were removed.
    pub(crate) fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let doomed: Vec<Handle<Tag>> = self
            .iter()
            .filter(|(_, value)| predicate(*value))
            .map(|(handle, _)| handle)
            .collect();

        doomed
            .into_iter()
            .filter(|&handle| self.remove(handle).is_some())
            .count()
    }

    /// Removes all entries. Outstanding handles become stale.
    pub(crate) fn clear(&mut self) {
        for index in self.order.drain(..) {
            let slot = &mut self.slots[index as usize];
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index);
        }
    }

    //--- Access -----------------------------------------------------------

    pub(crate) fn get(&self, handle: Handle<Tag>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn contains(&self, handle: Handle<Tag>) -> bool {
        self.get(handle).is_some()
    }

    /// Handle of the entry currently at draw-order `position`.
    pub(crate) fn handle_at(&self, position: usize) -> Option<Handle<Tag>> {
        let index = *self.order.get(position)?;
        Some(Handle::new(index, self.slots[index as usize].generation))
    }

    /// Entries in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Handle<Tag>, &T)> + '_ {
        self.order.iter().filter_map(move |&index| {
            let slot = &self.slots[index as usize];
            slot.value
                .as_ref()
                .map(|value| (Handle::new(index, slot.generation), value))
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T, Tag: ?Sized> Default for Arena<T, Tag> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
