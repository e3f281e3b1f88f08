use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

use std::error::Error;

use crate::access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
use crate::attributes;
use crate::attributes::AttributeInfo;
use crate::constants::ConstantPool;
use crate::constants::{self, Utf8};
use crate::descriptors::{FieldDescriptor, MethodDescriptor};
use crate::errors::class_format_check::{FormatCause, FormatError};

/// [Fields](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#%5B%7B%22num%22%3A721%2C%22gen%22%3A0%7D%2C%7B%22name%22%3A%22XYZ%22%7D%2C72%2C564%2Cnull%5D)
#[derive(Clone, Debug)]
pub struct FieldInfo {
    pub access_flags: Vec<FieldAccessFlags>,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes_count: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl FieldInfo {
    pub fn new(
        flags: u16,
        name_index: u16,
        descriptor_index: u16,
        attributes_count: u16,
        cursor: &mut Cursor<&[u8]>,
        constant_pool: &[ConstantPool],
    ) -> Result<FieldInfo, Box<dyn Error>> {
        let mut attributes = Vec::with_capacity(attributes_count as usize);
        attributes::read_attributes(constant_pool, &mut attributes, cursor)?;
        Ok(FieldInfo {
            access_flags: FieldAccessFlags::from_u16(flags),
            name_index,
            descriptor_index,
            attributes_count,
            attributes,
        })
    }

    /// The pool index of this field's `ConstantValue` attribute, if it has one.
    ///
    /// Only meaningful for `static final` fields of primitive or String type
    /// (§4.1 step 6); the linker honors it during preparation.
    pub fn constant_value_index(&self) -> Option<u16> {
        self.attributes.iter().find_map(|a| match a {
            AttributeInfo::ConstantValue(cv) => Some(cv.constantvalue_index),
            _ => None,
        })
    }

    pub fn name<'a>(&self, constant_pool: &'a [ConstantPool]) -> Option<&'a Utf8> {
        match &constant_pool[self.name_index as usize] {
            ConstantPool::Utf8(u) => Some(u),
            _ => None,
        }
    }

    pub fn get_type(&self, constant_pool: &[ConstantPool]) -> Vec<FieldDescriptor> {
        let ConstantPool::Utf8(desc) = constant_pool[self.descriptor_index as usize].clone()
        else {
            unreachable!(
                "could not get descriptor for field at index {}",
                self.descriptor_index
            );
        };
        let descriptors: Option<Vec<FieldDescriptor>> = Option::from(desc);
        descriptors.unwrap_or_default()
    }
}

/// [Methods](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#%5B%7B%22num%22%3A777%2C%22gen%22%3A0%7D%2C%7B%22name%22%3A%22XYZ%22%7D%2C72%2C282%2Cnull%5D)
#[derive(Clone, Debug)]
pub struct MethodInfo {
    pub access_flags: Vec<MethodAccessFlags>,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes_count: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl MethodInfo {
    pub fn new(
        flags: u16,
        name_index: u16,
        descriptor_index: u16,
        attributes_count: u16,
        cursor: &mut Cursor<&[u8]>,
        constant_pool: &[ConstantPool],
    ) -> Result<MethodInfo, Box<dyn Error>> {
        let mut attributes = Vec::with_capacity(attributes_count as usize);
        attributes::read_attributes(constant_pool, &mut attributes, cursor)?;
        Ok(MethodInfo {
            access_flags: MethodAccessFlags::from_u16(flags),
            name_index,
            descriptor_index,
            attributes_count,
            attributes,
        })
    }

    pub fn name<'a>(&self, constant_pool: &'a [ConstantPool]) -> Option<&'a Utf8> {
        match &constant_pool[self.name_index as usize] {
            ConstantPool::Utf8(u) => Some(u),
            _ => None,
        }
    }

    /// The method's `Code` attribute, if it has one (absent for abstract/native methods).
    pub fn code(&self) -> Option<&attributes::Code> {
        self.attributes.iter().find_map(|a| match a {
            AttributeInfo::Code(c) => Some(c),
            _ => None,
        })
    }

    pub fn get_params(&self, constant_pool: &[ConstantPool]) -> Vec<MethodDescriptor> {
        let ConstantPool::Utf8(desc) = constant_pool[self.descriptor_index as usize].clone()
        else {
            unreachable!(
                "could not get descriptor for method at index {}",
                self.descriptor_index
            );
        };
        let descriptors: Option<Vec<MethodDescriptor>> = Option::from(desc);
        descriptors
            .unwrap_or_default()
            .into_iter()
            .filter(|d| matches!(d, MethodDescriptor::ParameterDescriptor(_)))
            .collect()
    }

    pub fn get_return(&self, constant_pool: &[ConstantPool]) -> Option<MethodDescriptor> {
        let ConstantPool::Utf8(desc) = constant_pool[self.descriptor_index as usize].clone()
        else {
            unreachable!(
                "could not get descriptor for method at index {}",
                self.descriptor_index
            );
        };
        let descriptors: Option<Vec<MethodDescriptor>> = Option::from(desc);
        descriptors?.into_iter().find(|d| {
            matches!(
                d,
                MethodDescriptor::ReturnDescriptor(_) | MethodDescriptor::VoidReturn
            )
        })
    }
}

#[derive(Clone)]
pub struct ClassFile {
    /// Supplies the magic number identifying the class file format; must be `0xCAFEBABE`.
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    /// One greater than the number of entries in `constant_pool` (index 0 is unused).
    pub constant_pool_count: u16,
    /// 1-based; indexed from 1 to `constant_pool_count - 1`.
    pub constant_pool: Vec<ConstantPool>,
    pub access_flags: Vec<ClassAccessFlags>,
    /// Index into `constant_pool` of the `Class` entry naming this class.
    pub this_class: u16,
    /// Index of the superclass's `Class` entry, or 0 for `java.lang.Object`.
    pub super_class: u16,
    pub interfaces_count: u16,
    pub interfaces: Vec<u16>,
    pub field_count: u16,
    pub fields: Vec<FieldInfo>,
    pub methods_count: u16,
    pub methods: Vec<MethodInfo>,
    pub attributes_count: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    /// Parses a class file out of `bytes`. If `expected_name` is given, checks it
    /// against the name referenced by `this_class` and fails with
    /// `FormatCause::ClassNameMismatch` on a mismatch (§4.1 failure conditions).
    pub fn from_bytes(bytes: &[u8], expected_name: Option<&str>) -> Result<ClassFile, Box<dyn Error>> {
        let mut cursor = Cursor::new(bytes);
        let magic = cursor.read_u32::<BE>()?;
        let minor_version = cursor.read_u16::<BE>()?;
        let major_version = cursor.read_u16::<BE>()?;
        let constant_pool_count = cursor.read_u16::<BE>()?;
        if constant_pool_count < 1 {
            return Err(Box::new(FormatError::new(
                FormatCause::InvalidIndex(constant_pool_count),
                "constant_pool_count must be at least 1",
            )));
        }
        let constant_pool = {
            let mut pool = Vec::with_capacity(constant_pool_count as usize);
            pool.push(ConstantPool::Unknown);
            constants::read_constant_pool(&mut pool, &mut cursor, constant_pool_count)?;
            pool
        };
        let access_flags = ClassAccessFlags::from_u16(cursor.read_u16::<BE>()?);
        let this_class = cursor.read_u16::<BE>()?;
        let super_class = cursor.read_u16::<BE>()?;
        let interfaces_count = cursor.read_u16::<BE>()?;
        let interfaces = {
            let mut interfaces = Vec::with_capacity(interfaces_count as usize);
            for _ in 0..interfaces_count {
                interfaces.push(cursor.read_u16::<BE>()?);
            }
            interfaces
        };
        let field_count = cursor.read_u16::<BE>()?;
        let fields = {
            let mut fields = Vec::with_capacity(field_count as usize);
            for _ in 0..fields.capacity() {
                fields.push(FieldInfo::new(
                    cursor.read_u16::<BE>()?,
                    cursor.read_u16::<BE>()?,
                    cursor.read_u16::<BE>()?,
                    cursor.read_u16::<BE>()?,
                    &mut cursor,
                    &constant_pool,
                )?);
            }
            fields
        };
        let methods_count = cursor.read_u16::<BE>()?;
        let methods = {
            let mut methods = Vec::with_capacity(methods_count as usize);
            for _ in 0..methods.capacity() {
                methods.push(MethodInfo::new(
                    cursor.read_u16::<BE>()?,
                    cursor.read_u16::<BE>()?,
                    cursor.read_u16::<BE>()?,
                    cursor.read_u16::<BE>()?,
                    &mut cursor,
                    &constant_pool,
                )?);
            }
            methods
        };
        let attributes_count = cursor.read_u16::<BE>()?;
        let attributes = {
            let mut attribs = Vec::with_capacity(attributes_count as usize);
            attributes::read_attributes(&constant_pool, &mut attribs, &mut cursor)?;
            attribs
        };
        // The class file must not be truncated or have extra bytes at the end.
        // `Cursor::is_empty` needs nightly's `cursor_remaining` feature; comparing
        // position against the buffer length is the stable equivalent.
        if (cursor.position() as usize) != bytes.len() {
            return Err(Box::new(FormatError::new(
                FormatCause::ExtraBytes,
                "class file has leftover bytes",
            )));
        }
        let class = ClassFile {
            magic,
            minor_version,
            major_version,
            constant_pool_count,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces_count,
            interfaces,
            field_count,
            fields,
            methods_count,
            methods,
            attributes_count,
            attributes,
        };
        check_format(&class)?;
        if let Some(expected) = expected_name {
            let actual = class.this_class_name()?;
            if actual != expected {
                return Err(Box::new(FormatError::new(
                    FormatCause::ClassNameMismatch,
                    &format!("expected class named {expected:?}, this_class names {actual:?}"),
                )));
            }
        }
        Ok(class)
    }

    /// The canonical name this class file declares for itself via `this_class`.
    pub fn this_class_name(&self) -> Result<String, FormatError> {
        let ConstantPool::Class(c) = self.get_from_constant_pool(self.this_class)? else {
            return Err(FormatError::new(
                FormatCause::InvalidIndex(self.this_class),
                "this_class did not point at a Class constant",
            ));
        };
        let ConstantPool::Utf8(name) = self.get_from_constant_pool(c.name_index)? else {
            return Err(FormatError::new(
                FormatCause::InvalidIndex(c.name_index),
                "this_class's Class entry did not point at a Utf8 constant",
            ));
        };
        Ok(std::string::String::from(name))
    }

    /// The canonical name of the superclass, or `None` for `java.lang.Object`.
    pub fn super_class_name(&self) -> Result<Option<String>, FormatError> {
        if self.super_class == 0 {
            return Ok(None);
        }
        let ConstantPool::Class(c) = self.get_from_constant_pool(self.super_class)? else {
            return Err(FormatError::new(
                FormatCause::InvalidIndex(self.super_class),
                "super_class did not point at a Class constant",
            ));
        };
        let ConstantPool::Utf8(name) = self.get_from_constant_pool(c.name_index)? else {
            return Err(FormatError::new(
                FormatCause::InvalidIndex(c.name_index),
                "super_class's Class entry did not point at a Utf8 constant",
            ));
        };
        Ok(Some(std::string::String::from(name)))
    }

    pub fn to_pretty_fmt(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Magic: {:#010X}\n", self.magic));
        output.push_str(&format!(
            "Java Version: {}.{}\n",
            self.major_version, self.minor_version
        ));
        output.push_str(&format!(
            "Constant Pool: Size {}\n[\n",
            self.constant_pool_count
        ));
        for (i, entry) in self.constant_pool.iter().enumerate() {
            if i != 0 {
                output.push_str(&format!("{i}: {entry:#?}\n"));
            }
        }
        output.push_str("]\n");
        output.push_str(&format!("Class Access Flags: {:?}\n", self.access_flags));
        output.push_str(&format!("This Class Index: {}\n", self.this_class));
        output.push_str(&format!("Super Class Index: {}\n", self.super_class));
        output.push_str(&format!(
            "Interfaces: Size {}\n\t{:?}\n",
            self.interfaces.len(),
            self.interfaces
        ));
        output.push_str(&format!("Fields: Count {}\n", self.field_count));
        output.push_str(&format!("Method Count: {}\n", self.methods_count));
        output.push_str(&format!(
            "Attributes: {}\n{:#?}",
            self.attributes_count, self.attributes
        ));
        output
    }

    pub fn get_from_constant_pool(&self, index: u16) -> Result<&ConstantPool, FormatError> {
        if index == 0 || index >= self.constant_pool_count {
            return Err(FormatError::new(
                FormatCause::InvalidIndex(index),
                "index out of bounds for this constant pool",
            ));
        }
        Ok(&self.constant_pool[index as usize])
    }
}

/// [Format Checking](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#%5B%7B%22num%22%3A2235%2C%22gen%22%3A0%7D%2C%7B%22name%22%3A%22XYZ%22%7D%2C72%2C590%2Cnull%5D)
///
/// Structural checks only (§1 Non-goals excludes bytecode type-safety
/// verification): every pool index must resolve in range and to the
/// expected tag.
fn check_format(class: &ClassFile) -> Result<(), FormatError> {
    if class.magic != 0xCAFEBABE {
        return Err(FormatError::new(
            FormatCause::IncorrectMagic(0xCAFEBABE),
            &format!("magic value in class file was {:#010X}", class.magic),
        ));
    }
    if class.access_flags.contains(&ClassAccessFlags::AccModule) && class.access_flags.len() > 1 {
        return Err(FormatError::new(
            FormatCause::TooManyFlags,
            "ACC_MODULE must be the only flag set on a module class file",
        ));
    }

    for constant in &class.constant_pool {
        match constant {
            ConstantPool::Class(c) => {
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(c.name_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(c.name_index),
                        "Class name_index was not a Utf8 constant",
                    ));
                };
            }
            ConstantPool::String(s) => {
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(s.string_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(s.string_index),
                        "String string_index was not a Utf8 constant",
                    ));
                };
            }
            ConstantPool::Fieldref(f) => {
                let ConstantPool::Class(_) = class.get_from_constant_pool(f.class_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(f.class_index),
                        "Fieldref class_index was not a Class constant",
                    ));
                };
                let ConstantPool::NameAndType(nat) =
                    class.get_from_constant_pool(f.name_and_type_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(f.name_and_type_index),
                        "Fieldref name_and_type_index was not a NameAndType constant",
                    ));
                };
                let ConstantPool::Utf8(desc) =
                    class.get_from_constant_pool(nat.descriptor_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(nat.descriptor_index),
                        "Fieldref descriptor was not a Utf8 constant",
                    ));
                };
                let descriptor: Option<Vec<FieldDescriptor>> = Option::from(desc.clone());
                if descriptor.is_none() {
                    return Err(FormatError::new(
                        FormatCause::InvalidDescriptor(std::string::String::from(desc)),
                        "Fieldref descriptor was not a valid field descriptor",
                    ));
                }
            }
            ConstantPool::Methodref(m) => {
                let ConstantPool::Class(_) = class.get_from_constant_pool(m.class_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(m.class_index),
                        "Methodref class_index was not a Class constant",
                    ));
                };
                let ConstantPool::NameAndType(nat) =
                    class.get_from_constant_pool(m.name_and_type_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(m.name_and_type_index),
                        "Methodref name_and_type_index was not a NameAndType constant",
                    ));
                };
                let ConstantPool::Utf8(name) = class.get_from_constant_pool(nat.name_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(nat.name_index),
                        "Methodref name was not a Utf8 constant",
                    ));
                };
                let ConstantPool::Utf8(desc) =
                    class.get_from_constant_pool(nat.descriptor_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(nat.descriptor_index),
                        "Methodref descriptor was not a Utf8 constant",
                    ));
                };
                let descriptor: Option<Vec<MethodDescriptor>> = Option::from(desc.clone());
                match descriptor {
                    Some(descrip) => {
                        let name = std::string::String::from(name);
                        if name == "<init>" && !descrip.contains(&MethodDescriptor::VoidReturn) {
                            return Err(FormatError::new(
                                FormatCause::InvalidDescriptor(std::string::String::from(desc)),
                                "<init> descriptor did not declare a void return",
                            ));
                        }
                    }
                    None => {
                        return Err(FormatError::new(
                            FormatCause::InvalidDescriptor(std::string::String::from(desc)),
                            "Methodref descriptor was not a valid method descriptor",
                        ));
                    }
                }
            }
            ConstantPool::InterfaceMethodref(im) => {
                let ConstantPool::Class(_) = class.get_from_constant_pool(im.class_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(im.class_index),
                        "InterfaceMethodref class_index was not a Class constant",
                    ));
                };
                let ConstantPool::NameAndType(nat) =
                    class.get_from_constant_pool(im.name_and_type_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(im.name_and_type_index),
                        "InterfaceMethodref name_and_type_index was not a NameAndType constant",
                    ));
                };
                let ConstantPool::Utf8(desc) =
                    class.get_from_constant_pool(nat.descriptor_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(nat.descriptor_index),
                        "InterfaceMethodref descriptor was not a Utf8 constant",
                    ));
                };
                let descriptor: Option<Vec<MethodDescriptor>> = Option::from(desc.clone());
                if descriptor.is_none() {
                    return Err(FormatError::new(
                        FormatCause::InvalidDescriptor(std::string::String::from(desc)),
                        "InterfaceMethodref descriptor was not a valid method descriptor",
                    ));
                }
            }
            ConstantPool::NameAndType(nt) => {
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(nt.name_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(nt.name_index),
                        "NameAndType name_index was not a Utf8 constant",
                    ));
                };
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(nt.descriptor_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(nt.descriptor_index),
                        "NameAndType descriptor_index was not a Utf8 constant",
                    ));
                };
            }
            ConstantPool::MethodHandle(mh) => {
                let reference_kind_u8 = mh.reference_kind.clone() as u8;
                match reference_kind_u8 {
                    1..=4 => {
                        let ConstantPool::Fieldref(_) =
                            class.get_from_constant_pool(mh.reference_index)?
                        else {
                            return Err(FormatError::new(
                                FormatCause::InvalidIndex(mh.reference_index),
                                "MethodHandle reference_index was not a Fieldref constant",
                            ));
                        };
                    }
                    5 | 8 => {
                        let ConstantPool::Methodref(_) =
                            class.get_from_constant_pool(mh.reference_index)?
                        else {
                            return Err(FormatError::new(
                                FormatCause::InvalidIndex(mh.reference_index),
                                "MethodHandle reference_index was not a Methodref constant",
                            ));
                        };
                    }
                    6 | 7 => {
                        if class.major_version < 52 {
                            let ConstantPool::Methodref(_) =
                                class.get_from_constant_pool(mh.reference_index)?
                            else {
                                return Err(FormatError::new(
                                    FormatCause::InvalidIndex(mh.reference_index),
                                    "MethodHandle reference_index was not a Methodref constant",
                                ));
                            };
                        } else {
                            match class.get_from_constant_pool(mh.reference_index)? {
                                ConstantPool::Methodref(_) | ConstantPool::InterfaceMethodref(_) => {}
                                _ => {
                                    return Err(FormatError::new(
                                        FormatCause::InvalidIndex(mh.reference_index),
                                        "MethodHandle reference_index was neither a Methodref nor InterfaceMethodref constant",
                                    ));
                                }
                            }
                        }
                    }
                    9 => {
                        let ConstantPool::InterfaceMethodref(_) =
                            class.get_from_constant_pool(mh.reference_index)?
                        else {
                            return Err(FormatError::new(
                                FormatCause::InvalidIndex(mh.reference_index),
                                "MethodHandle reference_index was not an InterfaceMethodref constant",
                            ));
                        };
                    }
                    _ => {
                        return Err(FormatError::new(
                            FormatCause::InvalidReferenceKind(reference_kind_u8),
                            "MethodHandle reference kind was invalid",
                        ));
                    }
                }
            }
            ConstantPool::MethodType(mt) => {
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(mt.descriptor_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(mt.descriptor_index),
                        "MethodType descriptor_index was not a Utf8 constant",
                    ));
                };
            }
            // Dynamic / InvokeDynamic bootstrap_method_attr_index would normally be
            // cross-checked against the BootstrapMethods attribute; invokedynamic
            // bootstrap evaluation is a declared non-goal, so only the
            // name-and-type half of these entries is validated here.
            ConstantPool::Dynamic(d) => {
                let ConstantPool::NameAndType(_) =
                    class.get_from_constant_pool(d.name_and_type_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(d.name_and_type_index),
                        "Dynamic name_and_type_index was not a NameAndType constant",
                    ));
                };
            }
            ConstantPool::InvokeDynamic(id) => {
                let ConstantPool::NameAndType(_) =
                    class.get_from_constant_pool(id.name_and_type_index)?
                else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(id.name_and_type_index),
                        "InvokeDynamic name_and_type_index was not a NameAndType constant",
                    ));
                };
            }
            ConstantPool::Module(mo) => {
                if !class.access_flags.contains(&ClassAccessFlags::AccModule) {
                    return Err(FormatError::new(
                        FormatCause::InvalidConstant(constant.clone()),
                        "Module constant is not permitted outside a module class file",
                    ));
                }
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(mo.name_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(mo.name_index),
                        "Module name_index was not a Utf8 constant",
                    ));
                };
            }
            ConstantPool::Package(p) => {
                if !class.access_flags.contains(&ClassAccessFlags::AccModule) {
                    return Err(FormatError::new(
                        FormatCause::InvalidConstant(constant.clone()),
                        "Package constant is not permitted outside a module class file",
                    ));
                }
                let ConstantPool::Utf8(_) = class.get_from_constant_pool(p.name_index)? else {
                    return Err(FormatError::new(
                        FormatCause::InvalidIndex(p.name_index),
                        "Package name_index was not a Utf8 constant",
                    ));
                };
            }
            ConstantPool::Integer(_)
            | ConstantPool::Float(_)
            | ConstantPool::Long(_)
            | ConstantPool::Double(_)
            | ConstantPool::Utf8(_)
            | ConstantPool::Unknown => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Utf8;

    /// Builds the smallest legal class file: pool = {Class "A", Utf8 "A"},
    /// no fields, no methods, no attributes. Mirrors the "minimum class"
    /// scenario: pool_count=1 is illegal, so the smallest valid pool has two
    /// entries.
    fn minimum_class_bytes() -> Vec<u8> {
        let mut bytes = vec![];
        bytes.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes()); // minor
        bytes.extend_from_slice(&52u16.to_be_bytes()); // major
        bytes.extend_from_slice(&3u16.to_be_bytes()); // constant_pool_count (1 unused + 2 entries)
        bytes.push(7); // tag Class
        bytes.extend_from_slice(&2u16.to_be_bytes()); // name_index -> entry 2
        bytes.push(1); // tag Utf8
        bytes.extend_from_slice(&1u16.to_be_bytes()); // length
        bytes.push(b'A');
        bytes.extend_from_slice(&0u16.to_be_bytes()); // access_flags
        bytes.extend_from_slice(&1u16.to_be_bytes()); // this_class -> entry 1
        bytes.extend_from_slice(&0u16.to_be_bytes()); // super_class
        bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // fields_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // methods_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        bytes
    }

    #[test]
    fn minimum_class_parses() {
        let class = ClassFile::from_bytes(&minimum_class_bytes(), Some("A")).unwrap();
        assert_eq!(class.this_class_name().unwrap(), "A");
        assert_eq!(class.field_count, 0);
        assert_eq!(class.methods_count, 0);
    }

    #[test]
    fn class_name_mismatch_is_rejected() {
        let err = ClassFile::from_bytes(&minimum_class_bytes(), Some("NotA"));
        assert!(err.is_err());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = minimum_class_bytes();
        bytes[0] = 0x00;
        assert!(ClassFile::from_bytes(&bytes, None).is_err());
    }

    #[test]
    fn long_double_slotting_leaves_second_slot_unused() {
        // pool = {1: Long, 2: <unused>, 3: Class, 4: Utf8 "x"} -> constant_pool_count
        // must be 5 (valid indices 1..=4), with the Long's partner slot folded in.
        let mut bytes = vec![];
        bytes.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&52u16.to_be_bytes());
        bytes.extend_from_slice(&5u16.to_be_bytes()); // constant_pool_count
        bytes.push(5); // tag Long
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.push(7); // tag Class, to keep this_class valid
        bytes.extend_from_slice(&4u16.to_be_bytes()); // name_index -> entry 4 (Utf8)
        bytes.push(1); // tag Utf8
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.push(b'x');
        bytes.extend_from_slice(&0u16.to_be_bytes()); // access_flags
        bytes.extend_from_slice(&3u16.to_be_bytes()); // this_class -> entry 3 (the Class)
        bytes.extend_from_slice(&0u16.to_be_bytes()); // super_class
        bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // fields_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // methods_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
        let class = ClassFile::from_bytes(&bytes, None).unwrap();
        assert_eq!(class.constant_pool.len(), 5);
        assert!(matches!(class.constant_pool[1], ConstantPool::Long(_)));
        assert!(matches!(class.constant_pool[2], ConstantPool::Unknown));
        assert!(matches!(class.constant_pool[3], ConstantPool::Class(_)));
        assert!(matches!(class.constant_pool[4], ConstantPool::Utf8(_)));
    }

    #[test]
    fn utf8_round_trips_through_string_conversion() {
        let u = Utf8::from("hello");
        assert_eq!(std::string::String::from(&u), "hello");
    }
}
