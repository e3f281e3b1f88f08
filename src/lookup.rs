//! Field and method lookup across the super/interface graph (§4.5).
//!
//! `ClassEntry::find_field`/`find_method` only look inside one class; the
//! functions here are the ones that actually answer "does this class (or
//! something it inherits from) have a member with this name and
//! descriptor" by walking the method area.

use crate::class_entry::{FieldEntry, MethodEntry};
use crate::method_area::MethodArea;

/// Scans `cls`'s own fields, then its superclass chain, then its
/// interfaces breadth-first. Returns the owning class's method-area index
/// together with the field's index within that class, so callers that need
/// to cache a resolved pointer (the resolver) don't have to re-search for
/// the owner after getting a match.
pub fn find_field_with_owner(
    area: &MethodArea,
    cls: usize,
    name: &str,
    descriptor: &str,
) -> Option<(usize, usize)> {
    if let Some(idx) = area.with(cls, |e| e.fields.iter().position(|f| f.name == name && f.descriptor == descriptor)) {
        return Some((cls, idx));
    }
    let super_class = area.with(cls, |e| e.super_class);
    if let Some(super_class) = super_class {
        if let Some(found) = find_field_with_owner(area, super_class, name, descriptor) {
            return Some(found);
        }
    }

    let mut frontier: Vec<usize> = area.with(cls, |e| {
        e.interfaces.iter().filter_map(|i| i.resolved).collect()
    });
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for iface in frontier {
            if let Some(idx) = area.with(iface, |e| e.fields.iter().position(|f| f.name == name && f.descriptor == descriptor)) {
                return Some((iface, idx));
            }
            next.extend(area.with(iface, |e| {
                e.interfaces.iter().filter_map(|i| i.resolved).collect::<Vec<_>>()
            }));
        }
        frontier = next;
    }
    None
}

/// Scans `cls`'s own fields, then its superclass chain, then its
/// interfaces breadth-first. Returns the first match by exact
/// `(name, descriptor)`.
pub fn find_field(area: &MethodArea, cls: usize, name: &str, descriptor: &str) -> Option<FieldEntry> {
    let (owner, idx) = find_field_with_owner(area, cls, name, descriptor)?;
    Some(area.with(owner, |e| e.fields[idx].clone()))
}

/// Same as [`find_field_with_owner`], but the miss path only walks the
/// superclass chain — interfaces cannot provide a concrete, invokable
/// method entry the way `findMethod` needs (default methods are resolved
/// separately by `lookupVirtualMethod`'s interface fallback if ever added).
pub fn find_method_with_owner(
    area: &MethodArea,
    cls: usize,
    name: &str,
    descriptor: &str,
) -> Option<(usize, usize)> {
    if let Some(idx) = area.with(cls, |e| e.methods.iter().position(|m| m.name == name && m.descriptor == descriptor)) {
        return Some((cls, idx));
    }
    let super_class = area.with(cls, |e| e.super_class);
    super_class.and_then(|sup| find_method_with_owner(area, sup, name, descriptor))
}

/// Same as [`find_field`], but via [`find_method_with_owner`]'s superclass-only walk.
pub fn find_method(
    area: &MethodArea,
    cls: usize,
    name: &str,
    descriptor: &str,
) -> Option<MethodEntry> {
    let (owner, idx) = find_method_with_owner(area, cls, name, descriptor)?;
    Some(area.with(owner, |e| e.methods[idx].clone()))
}

/// Dynamic dispatch for `invokevirtual`/`invokeinterface`: starting at the
/// receiver's concrete class, walks up the super chain and returns the
/// first non-private, non-static match.
pub fn lookup_virtual_method(
    area: &MethodArea,
    receiver_class: usize,
    name: &str,
    descriptor: &str,
) -> Option<MethodEntry> {
    use classfile::access_flags::MethodAccessFlags;

    let mut current = Some(receiver_class);
    while let Some(cls) = current {
        if let Some(method) = area.with(cls, |e| e.find_method(name, descriptor).cloned()) {
            let dispatchable = !method
                .access_flags
                .iter()
                .any(|f| matches!(f, MethodAccessFlags::AccPrivate | MethodAccessFlags::AccStatic));
            if dispatchable {
                return Some(method);
            }
        }
        current = area.with(cls, |e| e.super_class);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_entry::{ClassEntry, ClassState, FieldEntry, MethodEntry};
    use crate::object::ObjectHeader;
    use classfile::access_flags::MethodAccessFlags;

    fn class(name: &str, super_class: Option<usize>) -> ClassEntry {
        ClassEntry {
            header: ObjectHeader::for_class_meta_object(),
            name: name.into(),
            super_name: None,
            source_file: None,
            state: ClassState::Linked,
            access_flags: vec![],
            constant_pool: vec![],
            fields: vec![],
            methods: vec![],
            interfaces: vec![],
            super_class,
            resolved: std::collections::HashMap::new(),
        }
    }

    fn method(name: &str, flags: Vec<MethodAccessFlags>) -> MethodEntry {
        MethodEntry {
            name: name.into(),
            descriptor: "()V".into(),
            access_flags: flags,
            max_stack: 0,
            max_locals: 0,
            code: None,
            instructions: vec![],
            exception_table: vec![],
        }
    }

    #[test]
    fn find_method_walks_the_super_chain_on_miss() {
        let area = MethodArea::new();
        let parent = area.define(class("Parent", None));
        area.with_mut(parent, |e| e.methods.push(method("foo", vec![])));
        let child = area.define(class("Child", Some(parent)));

        let found = find_method(&area, child, "foo", "()V");
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "foo");
    }

    #[test]
    fn virtual_dispatch_prefers_the_overriding_class() {
        let area = MethodArea::new();
        let parent = area.define(class("Parent", None));
        area.with_mut(parent, |e| e.methods.push(method("foo", vec![])));
        let child = area.define(class("Child", Some(parent)));
        area.with_mut(child, |e| e.methods.push(method("foo", vec![])));

        let found = lookup_virtual_method(&area, child, "foo", "()V").unwrap();
        assert_eq!(found.name, "foo");
        // resolved from Child directly, not by falling through to Parent
        let found_from_parent = area.with(parent, |e| e.find_method("foo", "()V").cloned());
        assert!(found_from_parent.is_some());
    }

    #[test]
    fn private_methods_are_not_virtually_dispatchable() {
        let area = MethodArea::new();
        let parent = area.define(class("Parent", None));
        area.with_mut(parent, |e| {
            e.methods.push(method("secret", vec![MethodAccessFlags::AccPrivate]))
        });
        let child = area.define(class("Child", Some(parent)));

        assert!(lookup_virtual_method(&area, child, "secret", "()V").is_none());
    }

    #[test]
    fn find_field_walks_interfaces_breadth_first() {
        let area = MethodArea::new();
        let iface = area.define(class("Iface", None));
        area.with_mut(iface, |e| {
            e.fields.push(FieldEntry {
                name: "CONST".into(),
                descriptor: "I".into(),
                access_flags: vec![],
                constant_value_index: None,
            })
        });
        let implementor = area.define(class("Impl", None));
        area.with_mut(implementor, |e| {
            e.interfaces.push(crate::class_entry::InterfaceRef {
                name: "Iface".into(),
                resolved: Some(iface),
            })
        });

        let found = find_field(&area, implementor, "CONST", "I");
        assert!(found.is_some());
    }
}
