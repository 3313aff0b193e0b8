//! Class file structure

use serde::Serialize;
use std::path::Path;

use crate::CLASS_MAGIC;
use crate::attribute::Attribute;
use crate::constant::ConstantPool;
use crate::error::{ClassFileError, Result};
use crate::member::{AccessFlags, MemberInfo};
use crate::reader::ByteReader;

/// A parsed class file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassFile {
    /// Minor version
    pub minor_version: u16,
    /// Major version
    pub major_version: u16,
    /// Constant pool
    pub constant_pool: ConstantPool,
    /// Class access flags
    pub access_flags: AccessFlags,
    /// Class index of this class
    pub this_class: u16,
    /// Class index of the superclass, 0 for `java/lang/Object` itself
    pub super_class: u16,
    /// Class indices of the direct superinterfaces
    pub interfaces: Vec<u16>,
    /// Fields
    pub fields: Vec<MemberInfo>,
    /// Methods
    pub methods: Vec<MemberInfo>,
    /// Class attributes
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Parse a class file from its bytes
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);

        let magic = reader.u32()?;
        if magic != CLASS_MAGIC {
            return Err(ClassFileError::InvalidMagic(magic));
        }
        let minor_version = reader.u16()?;
        let major_version = reader.u16()?;

        let pool_count = reader.u16()?;
        let constant_pool = ConstantPool::read(&mut reader, pool_count)?;

        let access_flags = AccessFlags(reader.u16()?);
        let this_class = reader.u16()?;
        let super_class = reader.u16()?;
        let interfaces = reader.u16_table()?;
        let fields = MemberInfo::read_table(&mut reader, &constant_pool)?;
        let methods = MemberInfo::read_table(&mut reader, &constant_pool)?;
        let attributes = Attribute::read_table(&mut reader, &constant_pool)?;

        if !reader.is_empty() {
            tracing::warn!(
                target: "lava::classfile",
                trailing = reader.remaining(),
                "bytes after the last class attribute ignored"
            );
        }

        let class = Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        };
        // this_class must name a Class entry
        let name = class.class_name()?;
        tracing::debug!(
            target: "lava::classfile",
            class = name,
            version = %format!("{major_version}.{minor_version}"),
            pool = class.constant_pool.size(),
            fields = class.fields.len(),
            methods = class.methods.len(),
            "class parsed"
        );
        Ok(class)
    }

    /// Read and parse a class file from disk
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Binary name of this class
    pub fn class_name(&self) -> Result<&str> {
        self.constant_pool.class_name(self.this_class)
    }

    /// Binary name of the superclass
    pub fn super_class_name(&self) -> Option<&str> {
        match self.super_class {
            0 => None,
            index => self.constant_pool.class_name(index).ok(),
        }
    }

    /// Value of the `SourceFile` attribute
    pub fn source_file(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            Attribute::SourceFile { index } => self.constant_pool.utf8(*index).ok(),
            _ => None,
        })
    }

    /// First method with the given name
    pub fn method(&self, name: &str) -> Option<&MemberInfo> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Field with the given name
    pub fn field(&self, name: &str) -> Option<&MemberInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}
