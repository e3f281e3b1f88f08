//! Error taxonomy for class-file parsing and constant-pool decoding.
//!
//! Split the way the original loader split it: malformed *bytes* are a
//! [`class_format_check::FormatError`], malformed *references* discovered while
//! walking already-parsed structures are a [`class_loading::LoadingError`].

pub mod class_format_check {
    use crate::constants::ConstantPool;
    use thiserror::Error;

    /// Why a class file failed the format check in [`crate::class_file::ClassFile::from_bytes`].
    #[derive(Debug, Error)]
    pub enum FormatCause {
        #[error("magic number was not {0:#010X}")]
        IncorrectMagic(u32),
        #[error("class file has leftover bytes past its declared structures")]
        ExtraBytes,
        #[error("constant pool index {0} out of range")]
        InvalidIndex(u16),
        #[error("descriptor could not be parsed: {0}")]
        InvalidDescriptor(String),
        #[error("method handle reference_kind {0} is not in 1..=9")]
        InvalidReferenceKind(u8),
        #[error("constant pool entry had an unexpected shape: {0:?}")]
        InvalidConstant(ConstantPool),
        #[error("required attribute was missing")]
        MissingAttribute,
        #[error("too many access flags set for this kind of class file")]
        TooManyFlags,
        #[error("declared class name did not match the this_class constant pool entry")]
        ClassNameMismatch,
        #[error("attribute was duplicated or its length did not match its contents")]
        MalformedAttribute,
        #[error("input was truncated before its declared structures were fully read")]
        Truncated,
    }

    /// A format violation, with the raw I/O cause (truncation) chained beneath it.
    #[derive(Debug, Error)]
    #[error("format error: {cause} ({msg})")]
    pub struct FormatError {
        pub cause: FormatCause,
        pub msg: String,
        #[source]
        pub source: Option<std::io::Error>,
    }

    impl FormatError {
        pub fn new(cause: FormatCause, msg: &str) -> FormatError {
            FormatError {
                cause,
                msg: msg.into(),
                source: None,
            }
        }

        pub fn from_io(cause: FormatCause, msg: &str, source: std::io::Error) -> FormatError {
            FormatError {
                cause,
                msg: msg.into(),
                source: Some(source),
            }
        }
    }

    impl From<std::io::Error> for FormatError {
        fn from(e: std::io::Error) -> Self {
            FormatError::from_io(FormatCause::Truncated, "unexpected end of class file", e)
        }
    }
}

pub mod class_loading {
    use crate::constants::ConstantPool;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum LoadingCause {
        #[error("constant pool tag {0} is not a recognized tag")]
        InvalidConstantTag(u8),
        #[error("attribute_name_index did not point at a Utf8 constant: {0:?}")]
        InvalidAttributeNameIndex(ConstantPool),
        #[error("target_info value {0} is not valid for its target_type")]
        InvalidTargetInfoValue(u8),
        #[error("target_type value {0} is not a recognized type-annotation target")]
        InvalidTargetTypeValue(u8),
        #[error("type_path kind {0} is not in 0..=3")]
        InvalidTypePathKind(u8),
    }

    #[derive(Debug, Error)]
    #[error("loading error: {cause} ({msg})")]
    pub struct LoadingError {
        pub cause: LoadingCause,
        pub msg: String,
    }

    impl LoadingError {
        pub fn new(cause: LoadingCause, msg: &str) -> LoadingError {
            LoadingError {
                cause,
                msg: msg.into(),
            }
        }
    }
}
