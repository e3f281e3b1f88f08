//! [Attributes](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#%5B%7B%22num%22%3A1244%2C%22gen%22%3A0%7D%2C%7B%22name%22%3A%22XYZ%22%7D%2C72%2C564%2Cnull%5D)
//!
//! Only the attributes the core actually interprets are decoded into their
//! own variant: `ConstantValue` (step 6 of the class-file parse), `Code`
//! (step 7), and `SourceFile` (step 8). Everything else — annotations,
//! signatures, inner-class tables, module descriptors, debugger metadata —
//! is preserved as [`AttributeInfo::Other`] so a dump or re-serialization
//! never loses bytes, without the core having to understand every table the
//! class-file format can carry.

use std::error::Error;
use std::io::Cursor;

use byteorder::{ReadBytesExt, BE};

use crate::constants::ConstantPool;
use crate::errors::class_loading::{LoadingCause, LoadingError};

#[derive(Clone, Debug)]
pub enum AttributeInfo {
    ConstantValue(ConstantValue),
    Code(Code),
    SourceFile(SourceFile),
    /// Any attribute this parser does not materialize into a dedicated shape.
    Other(OtherAttribute),
}

#[derive(Clone, Debug)]
pub struct OtherAttribute {
    pub name_index: u16,
    pub raw: Vec<u8>,
}

/// [Constant Value](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#%5B%7B%22num%22%3A2771%2C%22gen%22%3A0%7D%2C%7B%22name%22%3A%22XYZ%22%7D%2C72%2C390%2Cnull%5D)
#[derive(Clone, Debug)]
pub struct ConstantValue {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    /// Index into the constant pool giving the value this attribute represents.
    pub constantvalue_index: u16,
}

impl ConstantValue {
    pub fn new(
        attribute_name_index: u16,
        attribute_length: u32,
        constantvalue_index: u16,
    ) -> ConstantValue {
        ConstantValue {
            attribute_name_index,
            attribute_length,
            constantvalue_index,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

impl ExceptionTableEntry {
    pub fn new(start_pc: u16, end_pc: u16, handler_pc: u16, catch_type: u16) -> ExceptionTableEntry {
        ExceptionTableEntry {
            start_pc,
            end_pc,
            handler_pc,
            catch_type,
        }
    }
}

/// [Code](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#%5B%7B%22num%22%3A793%2C%22gen%22%3A0%7D%2C%7B%22name%22%3A%22XYZ%22%7D%2C72%2C275%2Cnull%5D)
#[derive(Clone, Debug)]
pub struct Code {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    /// Maximum depth of the operand stack at any point during execution.
    pub max_stack: u16,
    /// Number of local variable slots, including incoming arguments.
    pub max_locals: u16,
    pub code_length: u32,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    /// Nested attributes of the Code attribute (LineNumberTable etc.), kept opaque.
    pub attributes: Vec<AttributeInfo>,
}

impl Code {
    pub fn new(
        attribute_name_index: u16,
        attribute_length: u32,
        constant_pool: &[ConstantPool],
        cursor: &mut Cursor<&[u8]>,
    ) -> Result<Code, Box<dyn Error>> {
        let max_stack = cursor.read_u16::<BE>()?;
        let max_locals = cursor.read_u16::<BE>()?;
        let code_length = cursor.read_u32::<BE>()?;
        let mut code = vec![0u8; code_length as usize];
        cursor.read_exact(&mut code)?;
        let exception_table_length = cursor.read_u16::<BE>()?;
        let mut exception_table = Vec::with_capacity(exception_table_length as usize);
        for _ in 0..exception_table_length {
            exception_table.push(ExceptionTableEntry::new(
                cursor.read_u16::<BE>()?,
                cursor.read_u16::<BE>()?,
                cursor.read_u16::<BE>()?,
                cursor.read_u16::<BE>()?,
            ));
        }
        let attributes_count = cursor.read_u16::<BE>()?;
        let mut attributes = Vec::with_capacity(attributes_count as usize);
        read_attributes(constant_pool, &mut attributes, cursor)?;
        Ok(Code {
            attribute_name_index,
            attribute_length,
            max_stack,
            max_locals,
            code_length,
            code,
            exception_table,
            attributes,
        })
    }
}

/// [SourceFile](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#page=172)
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    /// Index into the constant pool of the Utf8 source file name.
    pub sourcefile_index: u16,
}

impl SourceFile {
    pub fn new(
        attribute_name_index: u16,
        attribute_length: u32,
        sourcefile_index: u16,
    ) -> SourceFile {
        SourceFile {
            attribute_name_index,
            attribute_length,
            sourcefile_index,
        }
    }
}

use std::io::Read;

pub(crate) fn read_attributes(
    constant_pool: &[ConstantPool],
    attributes: &mut Vec<AttributeInfo>,
    cursor: &mut Cursor<&[u8]>,
) -> Result<(), Box<dyn Error>> {
    let count = attributes.capacity();
    for _ in 0..count {
        let name_index = cursor.read_u16::<BE>()?;
        let name = &constant_pool[name_index as usize];
        let length = cursor.read_u32::<BE>()?;
        let ConstantPool::Utf8(n) = name else {
            return Err(Box::new(LoadingError::new(
                LoadingCause::InvalidAttributeNameIndex(name.clone()),
                &format!("attribute_name_index {name_index} did not point at a Utf8 constant"),
            )));
        };
        let attribute = match std::string::String::from(n).as_str() {
            "ConstantValue" => AttributeInfo::ConstantValue(ConstantValue::new(
                name_index,
                length,
                cursor.read_u16::<BE>()?,
            )),
            "Code" => {
                AttributeInfo::Code(Code::new(name_index, length, constant_pool, cursor)?)
            }
            "SourceFile" => AttributeInfo::SourceFile(SourceFile::new(
                name_index,
                length,
                cursor.read_u16::<BE>()?,
            )),
            _ => {
                let mut raw = vec![0u8; length as usize];
                cursor.read_exact(&mut raw)?;
                AttributeInfo::Other(OtherAttribute {
                    name_index,
                    raw,
                })
            }
        };
        attributes.push(attribute);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Utf8;

    fn pool_with(name: &str) -> Vec<ConstantPool> {
        vec![ConstantPool::Unknown, ConstantPool::Utf8(Utf8::from(name))]
    }

    #[test]
    fn unknown_attribute_is_preserved_as_raw_bytes() {
        let pool = pool_with("Exotic");
        let mut bytes = vec![0u8, 1]; // name_index = 1
        bytes.extend_from_slice(&3u32.to_be_bytes()); // attribute_length = 3
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut attributes = Vec::with_capacity(1);
        read_attributes(&pool, &mut attributes, &mut cursor).unwrap();
        let AttributeInfo::Other(other) = &attributes[0] else {
            panic!("expected Other variant");
        };
        assert_eq!(other.raw, vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn source_file_attribute_decodes() {
        let pool = pool_with("SourceFile");
        let mut bytes = vec![0u8, 1];
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&5u16.to_be_bytes());
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut attributes = Vec::with_capacity(1);
        read_attributes(&pool, &mut attributes, &mut cursor).unwrap();
        let AttributeInfo::SourceFile(sf) = &attributes[0] else {
            panic!("expected SourceFile variant");
        };
        assert_eq!(sf.sourcefile_index, 5);
    }
}
