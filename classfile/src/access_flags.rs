//! Three access-flag enums over the same underlying bit positions.
//!
//! `0x0020`, `0x0040`, `0x0080` carry different meanings at class, method and
//! field level (ACC_SUPER/ACC_SYNCHRONIZED, ACC_VOLATILE/ACC_BRIDGE,
//! ACC_TRANSIENT/ACC_VARARGS). Keeping three enums rather than one shared
//! bitset means the decoding site — which always knows whether it's reading a
//! class, a field or a method — picks the correct interpretation for free.

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// [Class Access Flags](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#page=85)
pub enum ClassAccessFlags {
    /// Declared public; may be accessed from outside its package.
    AccPublic = 0x0001,
    /// Declared final; no subclasses allowed.
    AccFinal = 0x0010,
    /// Treat superclass methods specially when invoked by
    /// the invokespecial instruction.
    AccSuper = 0x0020,
    /// Is an interface, not a class.
    AccInterface = 0x0200,
    /// Declared abstract; must not be instantiated.
    AccAbstract = 0x0400,
    /// Declared synthetic; not present in the source code.
    AccSynthetic = 0x1000,
    /// Declared as an annotation interface.
    AccAnnotation = 0x2000,
    /// Declared as an enum class.
    AccEnum = 0x4000,
    /// Is a module, not a class or interface.
    AccModule = 0x8000,
}

impl ClassAccessFlags {
    const ALL: [ClassAccessFlags; 9] = [
        ClassAccessFlags::AccPublic,
        ClassAccessFlags::AccFinal,
        ClassAccessFlags::AccSuper,
        ClassAccessFlags::AccInterface,
        ClassAccessFlags::AccAbstract,
        ClassAccessFlags::AccSynthetic,
        ClassAccessFlags::AccAnnotation,
        ClassAccessFlags::AccEnum,
        ClassAccessFlags::AccModule,
    ];

    pub fn from_u16(value: u16) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|flag| value & (*flag as u16) == *flag as u16)
            .collect()
    }
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// [Method Access Flags](https://docs.oracle.com/javase/specs/jvms/se17/jvms17.pdf#page=112)
pub enum MethodAccessFlags {
    AccPublic = 0x0001,
    AccPrivate = 0x0002,
    AccProtected = 0x0004,
    AccStatic = 0x0008,
    AccFinal = 0x0010,
    /// Invocation is wrapped by a monitor use.
    AccSynchronized = 0x0020,
    /// A bridge method, generated by the compiler.
    AccBridge = 0x0040,
    /// Declared with variable number of arguments.
    AccVarArgs = 0x0080,
    AccNative = 0x0100,
    AccAbstract = 0x0400,
    AccStrict = 0x0800,
    AccSynthetic = 0x1000,
}

impl MethodAccessFlags {
    const ALL: [MethodAccessFlags; 12] = [
        MethodAccessFlags::AccPublic,
        MethodAccessFlags::AccPrivate,
        MethodAccessFlags::AccProtected,
        MethodAccessFlags::AccStatic,
        MethodAccessFlags::AccFinal,
        MethodAccessFlags::AccSynchronized,
        MethodAccessFlags::AccBridge,
        MethodAccessFlags::AccVarArgs,
        MethodAccessFlags::AccNative,
        MethodAccessFlags::AccAbstract,
        MethodAccessFlags::AccStrict,
        MethodAccessFlags::AccSynthetic,
    ];

    pub fn from_u16(value: u16) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|flag| value & (*flag as u16) == *flag as u16)
            .collect()
    }

    pub fn is_static(flags: &[MethodAccessFlags]) -> bool {
        flags.contains(&MethodAccessFlags::AccStatic)
    }

    pub fn is_private(flags: &[MethodAccessFlags]) -> bool {
        flags.contains(&MethodAccessFlags::AccPrivate)
    }
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccessFlags {
    AccPublic = 0x0001,
    AccPrivate = 0x0002,
    AccProtected = 0x0004,
    AccStatic = 0x0008,
    AccFinal = 0x0010,
    /// Cannot be cached.
    AccVolatile = 0x0040,
    /// Not written or read by a persistent object manager.
    AccTransient = 0x0080,
    AccSynthetic = 0x1000,
    AccEnum = 0x4000,
}

impl FieldAccessFlags {
    const ALL: [FieldAccessFlags; 9] = [
        FieldAccessFlags::AccPublic,
        FieldAccessFlags::AccPrivate,
        FieldAccessFlags::AccProtected,
        FieldAccessFlags::AccStatic,
        FieldAccessFlags::AccFinal,
        FieldAccessFlags::AccVolatile,
        FieldAccessFlags::AccTransient,
        FieldAccessFlags::AccSynthetic,
        FieldAccessFlags::AccEnum,
    ];

    pub fn from_u16(value: u16) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|flag| value & (*flag as u16) == *flag as u16)
            .collect()
    }

    pub fn is_static(flags: &[FieldAccessFlags]) -> bool {
        flags.contains(&FieldAccessFlags::AccStatic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_overlapping_bits_by_context() {
        // 0x0020 means ACC_SUPER on a class but ACC_SYNCHRONIZED on a method.
        assert_eq!(
            ClassAccessFlags::from_u16(0x0020),
            vec![ClassAccessFlags::AccSuper]
        );
        assert_eq!(
            MethodAccessFlags::from_u16(0x0020),
            vec![MethodAccessFlags::AccSynchronized]
        );
        // 0x0040 means ACC_VOLATILE on a field but ACC_BRIDGE on a method.
        assert_eq!(
            FieldAccessFlags::from_u16(0x0040),
            vec![FieldAccessFlags::AccVolatile]
        );
        assert_eq!(
            MethodAccessFlags::from_u16(0x0040),
            vec![MethodAccessFlags::AccBridge]
        );
    }

    #[test]
    fn combines_independent_flags() {
        let flags = ClassAccessFlags::from_u16(0x0001 | 0x0010 | 0x0400);
        assert_eq!(
            flags,
            vec![
                ClassAccessFlags::AccPublic,
                ClassAccessFlags::AccFinal,
                ClassAccessFlags::AccAbstract
            ]
        );
    }
}
