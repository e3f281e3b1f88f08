//! The method-area store: an indexed set of loaded classes keyed by
//! canonical name (§2, §4.2's loader, §5's shared-resource policy).
//!
//! Guarded by a single lock; writers are class-definers (the loader),
//! readers are everything that looks a class up by name. A class's
//! `Loaded` state becomes visible to other readers atomically — there is
//! no window where a lookup can see a partially-populated `ClassEntry`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::class_entry::ClassEntry;

pub struct MethodArea {
    classes: Mutex<Vec<ClassEntry>>,
    by_name: Mutex<HashMap<String, usize>>,
}

impl MethodArea {
    pub fn new() -> MethodArea {
        MethodArea {
            classes: Mutex::new(Vec::new()),
            by_name: Mutex::new(HashMap::new()),
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.lock().unwrap().get(name).copied()
    }

    /// Registers `entry` under its own name, unless an entry with that name
    /// is already present (§4.2's cycle safety: a loader that re-enters on
    /// a class already at or past `Loading` gets the existing entry back
    /// rather than clobbering it).
    pub fn define(&self, entry: ClassEntry) -> usize {
        let name = entry.name.clone();
        let mut by_name = self.by_name.lock().unwrap();
        if let Some(&existing) = by_name.get(&name) {
            return existing;
        }
        let mut classes = self.classes.lock().unwrap();
        let index = classes.len();
        classes.push(entry);
        by_name.insert(name, index);
        index
    }

    pub fn with<R>(&self, index: usize, f: impl FnOnce(&ClassEntry) -> R) -> R {
        let classes = self.classes.lock().unwrap();
        f(&classes[index])
    }

    pub fn with_mut<R>(&self, index: usize, f: impl FnOnce(&mut ClassEntry) -> R) -> R {
        let mut classes = self.classes.lock().unwrap();
        f(&mut classes[index])
    }

    pub fn name_of(&self, index: usize) -> String {
        self.classes.lock().unwrap()[index].name.clone()
    }
}

impl Default for MethodArea {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_entry::ClassState;
    use crate::object::ObjectHeader;

    fn bare_entry(name: &str) -> ClassEntry {
        ClassEntry {
            header: ObjectHeader::for_class_meta_object(),
            name: name.into(),
            super_name: None,
            source_file: None,
            state: ClassState::Loaded,
            access_flags: vec![],
            constant_pool: vec![],
            fields: vec![],
            methods: vec![],
            interfaces: vec![],
            super_class: None,
            resolved: std::collections::HashMap::new(),
        }
    }

    #[test]
    fn redefining_the_same_name_returns_the_existing_index() {
        let area = MethodArea::new();
        let first = area.define(bare_entry("A"));
        let second = area.define(bare_entry("A"));
        assert_eq!(first, second);
    }

    #[test]
    fn each_canonical_name_has_exactly_one_entry() {
        let area = MethodArea::new();
        area.define(bare_entry("A"));
        area.define(bare_entry("B"));
        assert_eq!(area.index_of("A"), Some(0));
        assert_eq!(area.index_of("B"), Some(1));
        assert_eq!(area.index_of("C"), None);
    }
}
