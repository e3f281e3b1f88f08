//! Instruction extraction (§4.6): decodes a method's raw code buffer into a
//! table of one [`Instruction`] per bytecode offset, with a second pass that
//! rewrites branch operands from byte offsets into table indices so the
//! interpreter can dispatch branches in O(1) rather than re-scanning code.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

/// How an opcode's trailing bytes are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// No operand bytes follow the opcode.
    None,
    /// `n` raw operand bytes, not branch offsets.
    Fixed(u8),
    /// A single signed 2-byte branch offset, relative to this instruction's own offset.
    Branch16,
    /// A signed 4-byte branch offset (`goto_w`, `jsr_w`).
    Branch32,
    /// `tableswitch`: padding to 4-byte alignment, then default + low + high + (high-low+1) offsets.
    TableSwitch,
    /// `lookupswitch`: padding to 4-byte alignment, then default + npairs + npairs*(match, offset).
    LookupSwitch,
    /// `wide`: modifies the operand width of the following opcode.
    Wide,
}

#[derive(Debug, Clone)]
pub enum Operand {
    None,
    Bytes(Vec<u8>),
    /// A branch offset, resolved to an index into the instruction table
    /// by [`rewrite_branch_targets`]. Before rewriting this holds the raw
    /// byte offset relative to the instruction that owns it.
    BranchTarget(i32),
    /// `wide`: the opcode it widens, plus that opcode's widened operand
    /// bytes (2 bytes for most, 4 for `iinc`'s index+const pair).
    Wide {
        modified_opcode: u8,
        operand: Vec<u8>,
    },
    TableSwitch {
        default: i32,
        low: i32,
        high: i32,
        offsets: Vec<i32>,
    },
    LookupSwitch {
        default: i32,
        pairs: Vec<(i32, i32)>,
    },
}

#[derive(Debug, Clone)]
pub struct Instruction {
    /// Byte offset of this instruction within the method's code array.
    pub offset: u32,
    pub opcode: u8,
    pub operand: Operand,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}: {}", self.offset, mnemonic(self.opcode))
    }
}

/// Looks up the operand shape for an opcode. Unknown opcodes are treated as
/// having no operand, matching the format-checker's stance of preserving
/// rather than rejecting exotic bytes it doesn't interpret.
fn operand_shape(opcode: u8) -> OperandShape {
    match opcode {
        // bipush, ldc, [ilfda]load, [ilfda]store, ret, newarray
        0x10 | 0x12 | 0x15..=0x19 | 0x36..=0x3a | 0xa9 | 0xbc => OperandShape::Fixed(1),
        // sipush, ldc_w, ldc2_w, iinc, field/method refs, new, anewarray, checkcast, instanceof
        0x11 | 0x13 | 0x14 | 0x84 | 0xb2..=0xb7 | 0xb8 | 0xbb | 0xbd | 0xc0 | 0xc1 => {
            OperandShape::Fixed(2)
        }
        // multianewarray: index(2) + dimensions(1)
        0xc5 => OperandShape::Fixed(3),
        // invokeinterface: index(2) + count(1) + reserved(1); invokedynamic: index(2) + reserved(2)
        0xb9 | 0xba => OperandShape::Fixed(4),
        // goto_w, jsr_w
        0xc8 | 0xc9 => OperandShape::Branch32,
        // if_<cond>, if_icmp<cond>, if_acmp<cond>, goto, jsr, ifnull, ifnonnull
        0x99..=0xa8 | 0xc6 | 0xc7 => OperandShape::Branch16,
        0xaa => OperandShape::TableSwitch,
        0xab => OperandShape::LookupSwitch,
        0xc4 => OperandShape::Wide,
        _ => OperandShape::None,
    }
}

fn mnemonic(opcode: u8) -> &'static str {
    match opcode {
        0x00 => "nop",
        0x01 => "aconst_null",
        0x02..=0x08 => "iconst",
        0x10 => "bipush",
        0x11 => "sipush",
        0x12 => "ldc",
        0x13 => "ldc_w",
        0x14 => "ldc2_w",
        0x15 => "iload",
        0x16 => "lload",
        0x17 => "fload",
        0x18 => "dload",
        0x19 => "aload",
        0x36 => "istore",
        0x37 => "lstore",
        0x38 => "fstore",
        0x39 => "dstore",
        0x3a => "astore",
        0x99..=0xa6 => "if_cmp",
        0xa7 => "goto",
        0xa8 => "jsr",
        0xaa => "tableswitch",
        0xab => "lookupswitch",
        0xac..=0xb1 => "return",
        0xb2 => "getstatic",
        0xb3 => "putstatic",
        0xb4 => "getfield",
        0xb5 => "putfield",
        0xb6 => "invokevirtual",
        0xb7 => "invokespecial",
        0xb8 => "invokestatic",
        0xb9 => "invokeinterface",
        0xba => "invokedynamic",
        0xbb => "new",
        0xbc => "newarray",
        0xbd => "anewarray",
        0xbf => "athrow",
        0xc0 => "checkcast",
        0xc1 => "instanceof",
        0xc4 => "wide",
        0xc5 => "multianewarray",
        0xc6 => "ifnull",
        0xc7 => "ifnonnull",
        0xc8 => "goto_w",
        0xc9 => "jsr_w",
        _ => "opcode",
    }
}

/// Decodes `code` into one [`Instruction`] per bytecode offset and rewrites
/// branch/switch targets from byte offsets to indices into the returned
/// table. Unknown opcodes are decoded with a zero-length operand so a single
/// malformed or unrecognized byte doesn't desynchronize the rest of the scan
/// — structural verification of opcode validity is a job for the linker, not
/// the extractor.
pub fn extract_instructions(code: &[u8]) -> Result<Vec<Instruction>, Box<dyn Error>> {
    let mut instructions = Vec::new();
    let mut offset_to_index = HashMap::new();
    let mut cursor = Cursor::new(code);

    while (cursor.position() as usize) < code.len() {
        let offset = cursor.position() as u32;
        let opcode = cursor.read_u8()?;
        let operand = match operand_shape(opcode) {
            OperandShape::None => Operand::None,
            OperandShape::Fixed(n) => {
                let mut bytes = vec![0u8; n as usize];
                std::io::Read::read_exact(&mut cursor, &mut bytes)?;
                Operand::Bytes(bytes)
            }
            OperandShape::Branch16 => {
                Operand::BranchTarget(cursor.read_i16::<BE>()? as i32)
            }
            OperandShape::Branch32 => Operand::BranchTarget(cursor.read_i32::<BE>()?),
            OperandShape::Wide => {
                let modified_opcode = cursor.read_u8()?;
                // iinc's widened form carries a 2-byte index and a 2-byte
                // const; every other widenable opcode just gets a 2-byte
                // index instead of its normal 1-byte one.
                let width = if modified_opcode == 0x84 { 4 } else { 2 };
                let mut operand = vec![0u8; width];
                std::io::Read::read_exact(&mut cursor, &mut operand)?;
                Operand::Wide {
                    modified_opcode,
                    operand,
                }
            }
            OperandShape::TableSwitch => {
                let pad = (4 - (cursor.position() as usize % 4)) % 4;
                for _ in 0..pad {
                    cursor.read_u8()?;
                }
                let default = cursor.read_i32::<BE>()?;
                let low = cursor.read_i32::<BE>()?;
                let high = cursor.read_i32::<BE>()?;
                let count = (high - low + 1).max(0) as usize;
                let mut offsets = Vec::with_capacity(count);
                for _ in 0..count {
                    offsets.push(cursor.read_i32::<BE>()?);
                }
                Operand::TableSwitch {
                    default,
                    low,
                    high,
                    offsets,
                }
            }
            OperandShape::LookupSwitch => {
                let pad = (4 - (cursor.position() as usize % 4)) % 4;
                for _ in 0..pad {
                    cursor.read_u8()?;
                }
                let default = cursor.read_i32::<BE>()?;
                let npairs = cursor.read_i32::<BE>()?.max(0) as usize;
                let mut pairs = Vec::with_capacity(npairs);
                for _ in 0..npairs {
                    let m = cursor.read_i32::<BE>()?;
                    let o = cursor.read_i32::<BE>()?;
                    pairs.push((m, o));
                }
                Operand::LookupSwitch { default, pairs }
            }
        };
        offset_to_index.insert(offset, instructions.len());
        instructions.push(Instruction {
            offset,
            opcode,
            operand,
        });
    }

    rewrite_branch_targets(&mut instructions, &offset_to_index);
    Ok(instructions)
}

/// Second pass (§4.6): every `BranchTarget`/switch offset is relative to its
/// owning instruction's byte offset; this rewrites them into indices into
/// `instructions` so the interpreter dispatches branches with array indexing
/// instead of a linear offset search.
fn rewrite_branch_targets(instructions: &mut [Instruction], offset_to_index: &HashMap<u32, usize>) {
    for i in 0..instructions.len() {
        let base = instructions[i].offset as i64;
        match &mut instructions[i].operand {
            Operand::BranchTarget(raw_offset) => {
                let target = (base + *raw_offset as i64) as u32;
                if let Some(&idx) = offset_to_index.get(&target) {
                    *raw_offset = idx as i32;
                }
            }
            Operand::TableSwitch {
                default, offsets, ..
            } => {
                if let Some(&idx) = offset_to_index.get(&((base + *default as i64) as u32)) {
                    *default = idx as i32;
                }
                for off in offsets.iter_mut() {
                    if let Some(&idx) = offset_to_index.get(&((base + *off as i64) as u32)) {
                        *off = idx as i32;
                    }
                }
            }
            Operand::LookupSwitch { default, pairs } => {
                if let Some(&idx) = offset_to_index.get(&((base + *default as i64) as u32)) {
                    *default = idx as i32;
                }
                for (_, off) in pairs.iter_mut() {
                    if let Some(&idx) = offset_to_index.get(&((base + *off as i64) as u32)) {
                        *off = idx as i32;
                    }
                }
            }
            Operand::None | Operand::Bytes(_) | Operand::Wide { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_straight_line_sequence() {
        // iconst_0 (0x03), istore_1 (0x3c), return (0xb1)
        let code = [0x03u8, 0x3c, 0xb1];
        let instructions = extract_instructions(&code).unwrap();
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[0].offset, 0);
        assert_eq!(instructions[1].offset, 1);
        assert_eq!(instructions[2].offset, 2);
    }

    #[test]
    fn goto_branch_target_is_rewritten_to_an_instruction_index() {
        // offset 0: goto +3 (to offset 3); offset 3: return
        let mut code = vec![0xa7u8];
        code.extend_from_slice(&3i16.to_be_bytes());
        code.push(0xb1);
        let instructions = extract_instructions(&code).unwrap();
        let Operand::BranchTarget(target) = instructions[0].operand else {
            panic!("expected a branch target");
        };
        assert_eq!(target as usize, 1); // the `return` is instruction index 1
    }

    #[test]
    fn bipush_consumes_one_operand_byte() {
        let code = [0x10u8, 0x7f];
        let instructions = extract_instructions(&code).unwrap();
        assert_eq!(instructions.len(), 1);
        let Operand::Bytes(bytes) = &instructions[0].operand else {
            panic!("expected fixed operand bytes");
        };
        assert_eq!(bytes, &[0x7f]);
    }

    #[test]
    fn tableswitch_pads_to_four_byte_alignment_from_offset_zero() {
        // tableswitch at offset 0: opcode consumes 1 byte, so 3 pad bytes
        // bring `default` to offset 4, per JVMS (not 2, which the off-by-one
        // bug produced).
        let mut code = vec![0xaau8];
        code.extend_from_slice(&0i32.to_be_bytes()); // default -> instr index 0 (itself)
        code.extend_from_slice(&0i32.to_be_bytes()); // low
        code.extend_from_slice(&1i32.to_be_bytes()); // high
        code.extend_from_slice(&0i32.to_be_bytes()); // offsets[0] -> instr index 0
        code.extend_from_slice(&0i32.to_be_bytes()); // offsets[1] -> instr index 0
        code.push(0xb1); // return, right after the switch

        let instructions = extract_instructions(&code).unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[1].offset, 24);
        let Operand::TableSwitch { low, high, offsets, .. } = &instructions[0].operand else {
            panic!("expected a tableswitch operand");
        };
        assert_eq!(*low, 0);
        assert_eq!(*high, 1);
        assert_eq!(offsets.len(), 2);
    }

    #[test]
    fn wide_iload_consumes_a_two_byte_index() {
        // wide (0xc4), iload (0x15), 2-byte index, then return right after.
        let mut code = vec![0xc4u8, 0x15];
        code.extend_from_slice(&300u16.to_be_bytes());
        code.push(0xb1);

        let instructions = extract_instructions(&code).unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[1].offset, 4);
        let Operand::Wide { modified_opcode, operand } = &instructions[0].operand else {
            panic!("expected a wide operand");
        };
        assert_eq!(*modified_opcode, 0x15);
        assert_eq!(operand, &300u16.to_be_bytes());
    }

    #[test]
    fn wide_iinc_consumes_a_four_byte_index_and_const() {
        let mut code = vec![0xc4u8, 0x84];
        code.extend_from_slice(&300u16.to_be_bytes());
        code.extend_from_slice(&(-1i16).to_be_bytes());
        code.push(0xb1);

        let instructions = extract_instructions(&code).unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[1].offset, 6);
        let Operand::Wide { modified_opcode, operand } = &instructions[0].operand else {
            panic!("expected a wide operand");
        };
        assert_eq!(*modified_opcode, 0x84);
        assert_eq!(operand.len(), 4);
    }
}
