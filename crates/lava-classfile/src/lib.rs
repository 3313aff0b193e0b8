//! # Lava Classfile
//!
//! A read-only model of a Java class file, parsed from its binary form.
//!
//! Only the structure is decoded. Names are resolved through the
//! [`ConstantPool`] on demand, and bytecode is kept as raw bytes for the
//! compiler to translate.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod attribute;
pub mod class_file;
pub mod constant;
pub mod error;
pub mod member;
pub mod reader;

pub use attribute::{Attribute, CodeAttribute, ExceptionHandler, InnerClass, LineNumber};
pub use class_file::ClassFile;
pub use constant::{Constant, ConstantPool, ConstantTag, MemberRef};
pub use error::{ClassFileError, Result};
pub use member::{AccessFlags, MemberInfo};

/// First four bytes of every class file
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;
