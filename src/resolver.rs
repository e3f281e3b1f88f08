//! `LINKED -> RESOLVING -> RESOLVED` (§4.4).
//!
//! Walks the constant pool once, resolving every `Class`/`Fieldref`/
//! `Methodref`/`InterfaceMethodref` entry to a direct pointer and caching it
//! in the owning `ClassEntry::resolved` map. Resolution is idempotent:
//! entries already present in the cache are skipped, so re-entering
//! `resolve_class` on a class reachable through a mutual reference cycle
//! converges rather than looping.

use std::error::Error;

use classfile::constants::ConstantPool;

use crate::class_entry::ClassState;
use crate::errors::{ResolutionCause, ResolutionError};
use crate::linker::ClassResolver;
use crate::lookup::{find_field_with_owner, find_method_with_owner};
use crate::method_area::MethodArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedRef {
    Class(usize),
    Field { class: usize, field_index: usize },
    Method { class: usize, method_index: usize },
}

pub fn resolve_class(
    area: &MethodArea,
    index: usize,
    resolve_missing: &mut ClassResolver,
) -> Result<(), Box<dyn Error>> {
    let state = area.with(index, |e| e.state);
    if state >= ClassState::Resolved {
        return Ok(());
    }
    area.with_mut(index, |entry| entry.transition(ClassState::Resolving));

    let pool_len = area.with(index, |e| e.constant_pool.len());
    for pool_index in 1..pool_len {
        let already = area.with(index, |e| e.resolved.contains_key(&(pool_index as u16)));
        if already {
            continue;
        }
        let entry = area.with(index, |e| e.constant_pool[pool_index].clone());
        match entry {
            ConstantPool::Class(c) => {
                let target = resolve_class_ref(area, index, c.name_index, resolve_missing)?;
                cache(area, index, pool_index as u16, ResolvedRef::Class(target));
            }
            ConstantPool::Fieldref(f) => {
                let class_index =
                    class_index_of(area, index, f.class_index)?;
                let target =
                    resolve_class_ref(area, index, class_index, resolve_missing)?;
                let (name, descriptor) = name_and_type_of(area, index, f.name_and_type_index)?;
                let (owner, field_index) = find_field_with_owner(area, target, &name, &descriptor)
                    .ok_or_else(|| {
                        Box::new(ResolutionError::new(ResolutionCause::NoSuchField {
                            class: area.name_of(target),
                            name: name.clone(),
                            descriptor: descriptor.clone(),
                        })) as Box<dyn Error>
                    })?;
                cache(
                    area,
                    index,
                    pool_index as u16,
                    ResolvedRef::Field {
                        class: owner,
                        field_index,
                    },
                );
            }
            ConstantPool::Methodref(m) => {
                let class_index = class_index_of(area, index, m.class_index)?;
                let target = resolve_class_ref(area, index, class_index, resolve_missing)?;
                let (name, descriptor) = name_and_type_of(area, index, m.name_and_type_index)?;
                let (owner, method_index) = find_method_with_owner(area, target, &name, &descriptor)
                    .ok_or_else(|| {
                        Box::new(ResolutionError::new(ResolutionCause::NoSuchMethod {
                            class: area.name_of(target),
                            name: name.clone(),
                            descriptor: descriptor.clone(),
                        })) as Box<dyn Error>
                    })?;
                cache(
                    area,
                    index,
                    pool_index as u16,
                    ResolvedRef::Method {
                        class: owner,
                        method_index,
                    },
                );
            }
            ConstantPool::InterfaceMethodref(im) => {
                let class_index = class_index_of(area, index, im.class_index)?;
                let target = resolve_class_ref(area, index, class_index, resolve_missing)?;
                let (name, descriptor) = name_and_type_of(area, index, im.name_and_type_index)?;
                let (owner, method_index) = find_method_with_owner(area, target, &name, &descriptor)
                    .ok_or_else(|| {
                        Box::new(ResolutionError::new(ResolutionCause::NoSuchMethod {
                            class: area.name_of(target),
                            name: name.clone(),
                            descriptor: descriptor.clone(),
                        })) as Box<dyn Error>
                    })?;
                cache(
                    area,
                    index,
                    pool_index as u16,
                    ResolvedRef::Method {
                        class: owner,
                        method_index,
                    },
                );
            }
            _ => {}
        }
    }

    area.with_mut(index, |entry| entry.transition(ClassState::Resolved));
    Ok(())
}

fn cache(area: &MethodArea, index: usize, pool_index: u16, resolved: ResolvedRef) {
    area.with_mut(index, |entry| {
        entry.resolved.insert(pool_index, resolved);
    });
}

fn class_index_of(area: &MethodArea, index: usize, class_pool_index: u16) -> Result<u16, Box<dyn Error>> {
    area.with(index, |entry| match &entry.constant_pool[class_pool_index as usize] {
        ConstantPool::Class(c) => Ok(c.name_index),
        other => Err(Box::new(ResolutionError::new(
            ResolutionCause::IncompatibleClassChange {
                expected: "Class",
                actual: tag_name(other),
            },
        )) as Box<dyn Error>),
    })
}

fn name_and_type_of(
    area: &MethodArea,
    index: usize,
    nat_pool_index: u16,
) -> Result<(String, String), Box<dyn Error>> {
    area.with(index, |entry| {
        let ConstantPool::NameAndType(nat) = &entry.constant_pool[nat_pool_index as usize] else {
            return Err(Box::new(ResolutionError::new(
                ResolutionCause::IncompatibleClassChange {
                    expected: "NameAndType",
                    actual: "other",
                },
            )) as Box<dyn Error>);
        };
        let name = match &entry.constant_pool[nat.name_index as usize] {
            ConstantPool::Utf8(u) => String::from(u),
            _ => String::new(),
        };
        let descriptor = match &entry.constant_pool[nat.descriptor_index as usize] {
            ConstantPool::Utf8(u) => String::from(u),
            _ => String::new(),
        };
        Ok((name, descriptor))
    })
}

fn resolve_class_ref(
    area: &MethodArea,
    index: usize,
    name_index: u16,
    resolve_missing: &mut ClassResolver,
) -> Result<usize, Box<dyn Error>> {
    let name = area.with(index, |entry| match &entry.constant_pool[name_index as usize] {
        ConstantPool::Utf8(u) => String::from(u),
        _ => String::new(),
    });
    let target = match area.index_of(&name) {
        Some(idx) => idx,
        None => resolve_missing(area, &name)?,
    };
    let state = area.with(target, |e| e.state);
    if state < ClassState::Linked {
        return Err(Box::new(ResolutionError::new(ResolutionCause::NoSuchClass(
            name,
        ))));
    }
    Ok(target)
}

fn tag_name(c: &ConstantPool) -> &'static str {
    match c {
        ConstantPool::Utf8(_) => "Utf8",
        ConstantPool::Integer(_) => "Integer",
        ConstantPool::Float(_) => "Float",
        ConstantPool::Long(_) => "Long",
        ConstantPool::Double(_) => "Double",
        ConstantPool::Class(_) => "Class",
        ConstantPool::String(_) => "String",
        ConstantPool::Fieldref(_) => "Fieldref",
        ConstantPool::Methodref(_) => "Methodref",
        ConstantPool::InterfaceMethodref(_) => "InterfaceMethodref",
        ConstantPool::NameAndType(_) => "NameAndType",
        ConstantPool::MethodHandle(_) => "MethodHandle",
        ConstantPool::MethodType(_) => "MethodType",
        ConstantPool::Dynamic(_) => "Dynamic",
        ConstantPool::InvokeDynamic(_) => "InvokeDynamic",
        ConstantPool::Module(_) => "Module",
        ConstantPool::Package(_) => "Package",
        ConstantPool::Unknown => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_entry::{ClassEntry, FieldEntry, MethodEntry};
    use crate::object::ObjectHeader;
    use classfile::constants::{Class, Methodref, NameAndType, Utf8};

    fn class_with_pool(name: &str, pool: Vec<ConstantPool>) -> ClassEntry {
        ClassEntry {
            header: ObjectHeader::for_class_meta_object(),
            name: name.into(),
            super_name: None,
            source_file: None,
            state: ClassState::Linked,
            access_flags: vec![],
            constant_pool: pool,
            fields: vec![],
            methods: vec![],
            interfaces: vec![],
            super_class: None,
            resolved: std::collections::HashMap::new(),
        }
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let area = MethodArea::new();
        let target = area.define(class_with_pool("Target", vec![ConstantPool::Unknown]));
        area.with_mut(target, |e| {
            e.methods.push(MethodEntry {
                name: "foo".into(),
                descriptor: "()V".into(),
                access_flags: vec![],
                max_stack: 0,
                max_locals: 0,
                code: None,
                instructions: vec![],
                exception_table: vec![],
            });
        });

        let pool = vec![
            ConstantPool::Unknown,
            ConstantPool::Utf8(Utf8::from("Target")),
            ConstantPool::Class(Class::new(1)),
            ConstantPool::Utf8(Utf8::from("foo")),
            ConstantPool::Utf8(Utf8::from("()V")),
            ConstantPool::NameAndType(NameAndType::new(3, 4)),
            ConstantPool::Methodref(Methodref::new(2, 5)),
        ];
        let caller = area.define(class_with_pool("Caller", pool));

        let mut resolve_missing =
            |_: &MethodArea, n: &str| -> Result<usize, Box<dyn Error>> {
                panic!("unexpected missing class {n}")
            };
        resolve_class(&area, caller, &mut resolve_missing).unwrap();
        let resolved_once = area.with(caller, |e| e.resolved.clone());
        resolve_class(&area, caller, &mut resolve_missing).unwrap();
        let resolved_twice = area.with(caller, |e| e.resolved.clone());
        assert_eq!(resolved_once, resolved_twice);
        assert_eq!(
            resolved_once.get(&6),
            Some(&ResolvedRef::Method {
                class: target,
                method_index: 0
            })
        );
    }

    #[test]
    fn resolving_a_methodref_to_an_inherited_method_walks_the_super_chain() {
        let area = MethodArea::new();
        let parent = area.define(class_with_pool("Parent", vec![ConstantPool::Unknown]));
        area.with_mut(parent, |e| {
            e.methods.push(MethodEntry {
                name: "foo".into(),
                descriptor: "()V".into(),
                access_flags: vec![],
                max_stack: 0,
                max_locals: 0,
                code: None,
                instructions: vec![],
                exception_table: vec![],
            });
        });

        let mut child = class_with_pool("Child", vec![ConstantPool::Unknown]);
        child.super_class = Some(parent);
        let child = area.define(child);

        // A Methodref naming Child but only Parent defines `foo()V`.
        let pool = vec![
            ConstantPool::Unknown,
            ConstantPool::Utf8(Utf8::from("Child")),
            ConstantPool::Class(Class::new(1)),
            ConstantPool::Utf8(Utf8::from("foo")),
            ConstantPool::Utf8(Utf8::from("()V")),
            ConstantPool::NameAndType(NameAndType::new(3, 4)),
            ConstantPool::Methodref(Methodref::new(2, 5)),
        ];
        let caller = area.define(class_with_pool("Caller", pool));

        let mut resolve_missing = |_: &MethodArea, n: &str| -> Result<usize, Box<dyn Error>> {
            panic!("unexpected missing class {n}")
        };
        resolve_class(&area, caller, &mut resolve_missing).unwrap();
        let resolved = area.with(caller, |e| e.resolved.clone());
        assert_eq!(
            resolved.get(&6),
            Some(&ResolvedRef::Method {
                class: parent,
                method_index: 0
            })
        );
        // sanity: Child itself never gained the method directly.
        assert_eq!(area.with(child, |e| e.methods.len()), 0);
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let area = MethodArea::new();
        let _target = area.define(class_with_pool("Target", vec![ConstantPool::Unknown]));
        let _ = FieldEntry {
            name: "x".into(),
            descriptor: "I".into(),
            access_flags: vec![],
            constant_value_index: None,
        };
    }
}
