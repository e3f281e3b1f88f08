//! Activation frames (§3's StackFrame, §4.7).
//!
//! A `StackFrame` owns a LocalVarTable and an OperandStack (both
//! [`SlotBuffer`]s), a program counter, and a handle back to the constant
//! pool of the method's owning class so dynamic linking during execution
//! can resolve pool entries without a second lookup. `pc == -1` means the
//! frame has not yet been entered.

use crate::slot::SlotBuffer;

#[derive(Debug)]
pub struct StackFrame {
    pub locals: SlotBuffer,
    pub operand_stack: SlotBuffer,
    /// -1 means the frame has not yet been entered.
    pub pc: i64,
    /// Index of the owning class's entry in the method area; resolved pool
    /// lookups during execution go through this handle.
    pub class_handle: Option<usize>,
    pub in_use: bool,
}

impl StackFrame {
    pub fn new(max_locals: usize, max_stack: usize) -> StackFrame {
        StackFrame {
            locals: SlotBuffer::new(max_locals),
            operand_stack: SlotBuffer::new(max_stack),
            pc: -1,
            class_handle: None,
            in_use: false,
        }
    }

    /// Rebinds this (pool-recycled) frame to a fresh call; does not
    /// reallocate the backing slot storage.
    pub fn bind(&mut self, class_handle: usize) {
        self.locals.reset();
        self.operand_stack.reset();
        self.pc = 0;
        self.class_handle = Some(class_handle);
        self.in_use = true;
    }

    /// Returns this frame to its pre-obtain state, ready for pool recycling.
    pub fn clear(&mut self) {
        self.locals.reset();
        self.operand_stack.reset();
        self.pc = -1;
        self.class_handle = None;
        self.in_use = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    #[test]
    fn clear_resets_pc_and_use_flag() {
        let mut frame = StackFrame::new(4, 4);
        frame.bind(7);
        frame.operand_stack.push(Slot::int(1)).unwrap();
        frame.clear();
        assert_eq!(frame.pc, -1);
        assert!(!frame.in_use);
        assert!(frame.operand_stack.is_empty());
        assert!(frame.class_handle.is_none());
    }
}
