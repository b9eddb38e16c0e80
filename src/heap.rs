//! Object heap
//!
//! Objects live in an arena and are addressed by [`ObjectId`] handles. The
//! heap only grows: the objects a shim installs onto live as long as the
//! context, so nothing is ever collected.

use crate::runtime::object::{JSObject, ObjectId};

#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<JSObject>,
}

impl Heap {
    pub fn new() -> Self {
        Heap { objects: Vec::new() }
    }

    /// Move an object into the heap, returning its handle
    pub fn alloc(&mut self, obj: JSObject) -> ObjectId {
        let id = ObjectId::from_index(self.objects.len() as u32);
        self.objects.push(obj);
        id
    }

    /// Borrow an object
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this heap.
    #[inline]
    pub fn get(&self, id: ObjectId) -> &JSObject {
        &self.objects[id.index()]
    }

    /// Mutably borrow an object
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this heap.
    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> &mut JSObject {
        &mut self.objects[id.index()]
    }

    /// Number of live objects
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
