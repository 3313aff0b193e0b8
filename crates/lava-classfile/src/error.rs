//! Class file errors

use thiserror::Error;

/// Errors that can occur while reading a class file
#[derive(Debug, Error)]
pub enum ClassFileError {
    /// Input ended in the middle of a structure
    #[error("Unexpected end of class file at offset {offset}")]
    UnexpectedEnd {
        /// Offset of the read that failed
        offset: usize,
    },

    /// The file does not start with 0xCAFEBABE
    #[error("Invalid magic: {0:#010x}")]
    InvalidMagic(u32),

    /// Constant pool entry with a tag this reader does not know
    #[error("Unknown constant tag {tag} at pool index {index}")]
    UnknownConstantTag {
        /// The tag byte
        tag: u8,
        /// Pool index being read
        index: u16,
    },

    /// Pool index outside the pool or pointing at an unusable slot
    #[error("Bad constant pool index {0}")]
    BadIndex(u16),

    /// Pool entry of a different kind than required
    #[error("Constant pool index {index} is {found}, expected {expected}")]
    WrongKind {
        /// Pool index
        index: u16,
        /// Kind required by the caller
        expected: &'static str,
        /// Kind actually stored
        found: &'static str,
    },

    /// An attribute whose body does not match its declared length or layout
    #[error("Malformed {name} attribute: {reason}")]
    MalformedAttribute {
        /// Attribute name
        name: String,
        /// What was wrong
        reason: String,
    },

    /// IO error while reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for class file operations
pub type Result<T> = std::result::Result<T, ClassFileError>;
