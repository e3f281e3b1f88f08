//! The uniform runtime object header (§3).
//!
//! Every runtime-visible entity — a loaded class's meta-object and an
//! ordinary heap instance alike — begins with the same two-word header, so
//! a garbage collector (an external collaborator; §1 Non-goals) can walk
//! the heap with one shape instead of special-casing classes.

/// Two pointer-width words shared by every heap-resident thing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectHeader {
    /// Reserved for monitor / identity-hash use; opaque to this crate.
    pub lock_word: u64,
    /// For an instance, the method-area index of its class. `None` for a
    /// class meta-object — its own class is implicit, not stored.
    pub class_pointer: Option<usize>,
}

impl ObjectHeader {
    pub fn for_class_meta_object() -> ObjectHeader {
        ObjectHeader {
            lock_word: 0,
            class_pointer: None,
        }
    }

    pub fn for_instance(class_pointer: usize) -> ObjectHeader {
        ObjectHeader {
            lock_word: 0,
            class_pointer: Some(class_pointer),
        }
    }
}
