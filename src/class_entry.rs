//! In-memory representation of a loaded class (§3 ClassEntry, FieldEntry,
//! MethodEntry) and the load-state lattice that governs it.

use classfile::access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
use classfile::attributes::AttributeInfo;
use classfile::class_file::ClassFile;
use classfile::constants::ConstantPool;
use classfile::instr::{extract_instructions, Instruction};

use crate::object::ObjectHeader;

/// `BAD < LOADING < LOADED < LINKING < LINKED < RESOLVING < RESOLVED < INITING < INITED`.
///
/// A class never regresses; the derived ordering on this enum lets
/// [`ClassEntry::transition`] check monotonicity with a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClassState {
    Bad,
    Loading,
    Loaded,
    Linking,
    Linked,
    Resolving,
    Resolved,
    Initing,
    Inited,
}

/// An interface a class implements, by name until resolved, then also by
/// method-area index.
#[derive(Debug, Clone)]
pub struct InterfaceRef {
    pub name: String,
    pub resolved: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub name: String,
    pub descriptor: String,
    pub access_flags: Vec<FieldAccessFlags>,
    /// Pool index of this field's `ConstantValue`, honored during initialization.
    pub constant_value_index: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub name: String,
    pub descriptor: String,
    pub access_flags: Vec<MethodAccessFlags>,
    pub max_stack: u16,
    pub max_locals: u16,
    /// Absent for abstract/native methods, which have no `Code` attribute.
    pub code: Option<Vec<u8>>,
    pub instructions: Vec<Instruction>,
    pub exception_table: Vec<ExceptionHandler>,
}

impl MethodEntry {
    pub fn argument_count(&self) -> usize {
        let descriptor = self.descriptor.as_str();
        let Some(params) = descriptor
            .strip_prefix('(')
            .and_then(|rest| rest.split(')').next())
        else {
            return 0;
        };
        let mut count = 0;
        let mut chars = params.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                'B' | 'C' | 'F' | 'I' | 'S' | 'Z' => count += 1,
                'D' | 'J' => count += 1,
                'L' => {
                    while chars.next_if(|&c| c != ';').is_some() {}
                    chars.next(); // consume ';'
                    count += 1;
                }
                '[' => {
                    while chars.next_if(|&c| c == '[').is_some() {}
                    match chars.next() {
                        Some('L') => {
                            while chars.next_if(|&c| c != ';').is_some() {}
                            chars.next();
                        }
                        _ => {}
                    }
                    count += 1;
                }
                _ => {}
            }
        }
        count
    }
}

pub struct ClassEntry {
    pub header: ObjectHeader,
    pub name: String,
    pub super_name: Option<String>,
    pub source_file: Option<String>,
    pub state: ClassState,
    pub access_flags: Vec<ClassAccessFlags>,
    pub constant_pool: Vec<ConstantPool>,
    pub fields: Vec<FieldEntry>,
    pub methods: Vec<MethodEntry>,
    pub interfaces: Vec<InterfaceRef>,
    /// Method-area index of the superclass, filled in by the linker.
    pub super_class: Option<usize>,
    /// Resolved-pointer cache for constant pool entries, keyed by pool
    /// index and written once each by the resolver (§3's ConstPool,
    /// §4.4: "double-checked lookup under the entry's cached pointer").
    pub resolved: std::collections::HashMap<u16, crate::resolver::ResolvedRef>,
}

impl ClassEntry {
    /// Builds an unlinked `ClassEntry` from a structurally-checked class
    /// file; the result starts in state `Loaded`. Decoding stops short of
    /// linking: no super-class lookup, no static field preparation.
    pub fn from_class_file(class: &ClassFile) -> Result<ClassEntry, Box<dyn std::error::Error>> {
        let name = class.this_class_name()?;
        let super_name = class.super_class_name()?;
        let source_file = class.attributes.iter().find_map(|a| match a {
            AttributeInfo::SourceFile(sf) => class
                .get_from_constant_pool(sf.sourcefile_index)
                .ok()
                .and_then(|c| match c {
                    ConstantPool::Utf8(u) => Some(String::from(u)),
                    _ => None,
                }),
            _ => None,
        });

        let fields = class
            .fields
            .iter()
            .map(|f| FieldEntry {
                name: f
                    .name(&class.constant_pool)
                    .map(String::from)
                    .unwrap_or_default(),
                descriptor: utf8_at(class, f.descriptor_index),
                access_flags: f.access_flags.clone(),
                constant_value_index: f.constant_value_index(),
            })
            .collect();

        let methods = class
            .methods
            .iter()
            .map(|m| -> Result<MethodEntry, Box<dyn std::error::Error>> {
                let code_attr = m.code();
                let (code, instructions, exception_table, max_stack, max_locals) = match code_attr
                {
                    Some(c) => (
                        Some(c.code.clone()),
                        extract_instructions(&c.code)?,
                        c.exception_table
                            .iter()
                            .map(|e| ExceptionHandler {
                                start_pc: e.start_pc,
                                end_pc: e.end_pc,
                                handler_pc: e.handler_pc,
                                catch_type: e.catch_type,
                            })
                            .collect(),
                        c.max_stack,
                        c.max_locals,
                    ),
                    None => (None, Vec::new(), Vec::new(), 0, 0),
                };
                Ok(MethodEntry {
                    name: m
                        .name(&class.constant_pool)
                        .map(String::from)
                        .unwrap_or_default(),
                    descriptor: utf8_at(class, m.descriptor_index),
                    access_flags: m.access_flags.clone(),
                    max_stack,
                    max_locals,
                    code,
                    instructions,
                    exception_table,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let interfaces = class
            .interfaces
            .iter()
            .map(|&idx| {
                let ConstantPool::Class(c) = &class.constant_pool[idx as usize] else {
                    return InterfaceRef {
                        name: String::new(),
                        resolved: None,
                    };
                };
                InterfaceRef {
                    name: utf8_at(class, c.name_index),
                    resolved: None,
                }
            })
            .collect();

        Ok(ClassEntry {
            header: ObjectHeader::for_class_meta_object(),
            name,
            super_name,
            source_file,
            state: ClassState::Loaded,
            access_flags: class.access_flags.clone(),
            constant_pool: class.constant_pool.clone(),
            fields,
            methods,
            interfaces,
            super_class: None,
            resolved: std::collections::HashMap::new(),
        })
    }

    /// Advances `self.state` to `next`. Moving backward, or to the same
    /// state, is a programming error — the lattice is strictly monotonic.
    pub fn transition(&mut self, next: ClassState) {
        assert!(
            next > self.state,
            "illegal class state transition: {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodEntry> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    pub fn find_field(&self, name: &str, descriptor: &str) -> Option<&FieldEntry> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.descriptor == descriptor)
    }
}

fn utf8_at(class: &ClassFile, index: u16) -> String {
    match class.get_from_constant_pool(index) {
        Ok(ConstantPool::Utf8(u)) => String::from(u),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_lattice_rejects_backward_transitions() {
        let mut entry = ClassEntry {
            header: ObjectHeader::for_class_meta_object(),
            name: "A".into(),
            super_name: None,
            source_file: None,
            state: ClassState::Linked,
            access_flags: vec![],
            constant_pool: vec![],
            fields: vec![],
            methods: vec![],
            interfaces: vec![],
            super_class: None,
            resolved: std::collections::HashMap::new(),
        };
        entry.transition(ClassState::Resolving);
        assert_eq!(entry.state, ClassState::Resolving);
    }

    #[test]
    #[should_panic]
    fn backward_transition_panics() {
        let mut entry = ClassEntry {
            header: ObjectHeader::for_class_meta_object(),
            name: "A".into(),
            super_name: None,
            source_file: None,
            state: ClassState::Inited,
            access_flags: vec![],
            constant_pool: vec![],
            fields: vec![],
            methods: vec![],
            interfaces: vec![],
            super_class: None,
            resolved: std::collections::HashMap::new(),
        };
        entry.transition(ClassState::Linking);
    }

    #[test]
    fn argument_count_handles_mixed_descriptor() {
        let method = MethodEntry {
            name: "m".into(),
            descriptor: "(ILjava/lang/String;[D)V".into(),
            access_flags: vec![],
            max_stack: 0,
            max_locals: 0,
            code: None,
            instructions: vec![],
            exception_table: vec![],
        };
        assert_eq!(method.argument_count(), 3);
    }
}
