//! Fields and methods

use serde::Serialize;
use std::fmt;

use crate::attribute::{Attribute, CodeAttribute};
use crate::constant::ConstantPool;
use crate::error::Result;
use crate::reader::ByteReader;

/// Access and property flags of a class, field or method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct AccessFlags(pub u16);

#[allow(missing_docs)]
impl AccessFlags {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_SYNCHRONIZED: u16 = 0x0020;
    pub const ACC_SUPER: u16 = 0x0020;
    pub const ACC_VOLATILE: u16 = 0x0040;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_TRANSIENT: u16 = 0x0080;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_NATIVE: u16 = 0x0100;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_STRICT: u16 = 0x0800;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
    pub const ACC_ANNOTATION: u16 = 0x2000;
    pub const ACC_ENUM: u16 = 0x4000;
    pub const ACC_MODULE: u16 = 0x8000;
}

impl AccessFlags {
    /// Whether every bit of `flag` is set
    #[inline]
    pub const fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// `ACC_STATIC`
    #[inline]
    pub const fn is_static(self) -> bool {
        self.contains(Self::ACC_STATIC)
    }

    /// `ACC_PUBLIC`
    #[inline]
    pub const fn is_public(self) -> bool {
        self.contains(Self::ACC_PUBLIC)
    }
}

impl fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// A field or a method. Methods are the members that carry a `Code` attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberInfo {
    /// Access flags
    pub access_flags: AccessFlags,
    /// Simple name
    pub name: String,
    /// Type or method descriptor
    pub descriptor: String,
    /// Attributes
    pub attributes: Vec<Attribute>,
}

impl MemberInfo {
    /// Create a member with no attributes
    pub fn new(access_flags: u16, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access_flags: AccessFlags(access_flags),
            name: name.into(),
            descriptor: descriptor.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Read one `field_info` or `method_info`, resolving its name and descriptor
    pub fn read(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Self> {
        let access_flags = AccessFlags(reader.u16()?);
        let name = pool.utf8(reader.u16()?)?.to_owned();
        let descriptor = pool.utf8(reader.u16()?)?.to_owned();
        let attributes = Attribute::read_table(reader, pool)?;
        Ok(Self {
            access_flags,
            name,
            descriptor,
            attributes,
        })
    }

    /// Read a `u2` count followed by that many members
    pub fn read_table(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Vec<Self>> {
        let count = reader.u16()?;
        (0..count).map(|_| Self::read(reader, pool)).collect()
    }

    /// Whether `ACC_STATIC` is set
    #[inline]
    pub fn is_static(&self) -> bool {
        self.access_flags.is_static()
    }

    /// Pool index from the `ConstantValue` attribute
    pub fn constant_value_index(&self) -> Option<u16> {
        self.attributes.iter().find_map(|attr| match attr {
            Attribute::ConstantValue { index } => Some(*index),
            _ => None,
        })
    }

    /// Body of the `Code` attribute
    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.iter().find_map(|attr| match attr {
            Attribute::Code(code) => Some(code),
            _ => None,
        })
    }
}
