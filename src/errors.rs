//! Error taxonomy for linking, resolution, lookup and the execution-stack
//! machinery (§7). Class-file *format* errors live in `classfile::errors`;
//! everything here is a failure discovered after a class file has already
//! parsed successfully.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkageCause {
    #[error("a super/interface chain referenced itself: {0}")]
    ClassCircularity(String),
    #[error("method {name}{descriptor} has code_length {len} exceeding 65535")]
    CodeTooLarge {
        name: String,
        descriptor: String,
        len: u32,
    },
    #[error("exception handler range [{start}, {end}) falls outside code of length {code_len}")]
    HandlerOutOfBounds { start: u16, end: u16, code_len: u32 },
}

#[derive(Debug, Error)]
#[error("linkage error: {cause}")]
pub struct LinkageError {
    pub cause: LinkageCause,
}

impl LinkageError {
    pub fn new(cause: LinkageCause) -> LinkageError {
        LinkageError { cause }
    }
}

#[derive(Debug, Error)]
pub enum ResolutionCause {
    #[error("no class named {0} could be found")]
    NoSuchClass(String),
    #[error("class {class} has no field {name}:{descriptor}")]
    NoSuchField {
        class: String,
        name: String,
        descriptor: String,
    },
    #[error("class {class} has no method {name}{descriptor}")]
    NoSuchMethod {
        class: String,
        name: String,
        descriptor: String,
    },
    #[error("resolved {expected} but the target was shaped like a {actual}")]
    IncompatibleClassChange {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Error)]
#[error("resolution error: {cause}")]
pub struct ResolutionError {
    pub cause: ResolutionCause,
}

impl ResolutionError {
    pub fn new(cause: ResolutionCause) -> ResolutionError {
        ResolutionError { cause }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeStackCause {
    #[error("java stack is already at its maximum depth of {0}")]
    StackOverflow(usize),
    #[error("pop/peek on an empty java stack")]
    EmptyStack,
    #[error("pool of capacity {0} has no free element to obtain")]
    PoolExhausted(usize),
}

#[derive(Debug, Error)]
#[error("runtime stack error: {0}")]
pub struct RuntimeStackError(pub RuntimeStackCause);
