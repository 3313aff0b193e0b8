//! Constant pool
//!
//! Entries keep the raw indices they were read with. Anything that needs a
//! name goes through the pool accessors, which check both the index and the
//! kind of the entry it lands on.

use serde::Serialize;

use crate::error::{ClassFileError, Result};
use crate::reader::ByteReader;

/// Constant pool tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ConstantTag {
    /// `CONSTANT_Utf8`
    Utf8 = 1,
    /// `CONSTANT_Integer`
    Integer = 3,
    /// `CONSTANT_Float`
    Float = 4,
    /// `CONSTANT_Long`
    Long = 5,
    /// `CONSTANT_Double`
    Double = 6,
    /// `CONSTANT_Class`
    Class = 7,
    /// `CONSTANT_String`
    String = 8,
    /// `CONSTANT_Fieldref`
    FieldRef = 9,
    /// `CONSTANT_Methodref`
    MethodRef = 10,
    /// `CONSTANT_InterfaceMethodref`
    InterfaceMethodRef = 11,
    /// `CONSTANT_NameAndType`
    NameAndType = 12,
    /// `CONSTANT_MethodHandle`
    MethodHandle = 15,
    /// `CONSTANT_MethodType`
    MethodType = 16,
    /// `CONSTANT_Dynamic`
    Dynamic = 17,
    /// `CONSTANT_InvokeDynamic`
    InvokeDynamic = 18,
    /// `CONSTANT_Module`
    Module = 19,
    /// `CONSTANT_Package`
    Package = 20,
}

impl ConstantTag {
    /// Tag for a byte read from the pool
    pub fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            1 => Self::Utf8,
            3 => Self::Integer,
            4 => Self::Float,
            5 => Self::Long,
            6 => Self::Double,
            7 => Self::Class,
            8 => Self::String,
            9 => Self::FieldRef,
            10 => Self::MethodRef,
            11 => Self::InterfaceMethodRef,
            12 => Self::NameAndType,
            15 => Self::MethodHandle,
            16 => Self::MethodType,
            17 => Self::Dynamic,
            18 => Self::InvokeDynamic,
            19 => Self::Module,
            20 => Self::Package,
            _ => return None,
        })
    }
}

/// One constant pool entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constant {
    /// Slot 0, and the slot after every long or double
    Unusable,
    /// Text, decoded from modified UTF-8
    Utf8(String),
    /// 32-bit integer
    Integer(i32),
    /// 32-bit float
    Float(f32),
    /// 64-bit integer
    Long(i64),
    /// 64-bit float
    Double(f64),
    /// Class or interface name
    Class {
        /// Utf8 index of the binary name
        name_index: u16,
    },
    /// String literal
    String {
        /// Utf8 index of the text
        string_index: u16,
    },
    /// Field reference
    FieldRef {
        /// Class index of the owner
        class_index: u16,
        /// NameAndType index
        name_and_type_index: u16,
    },
    /// Method reference
    MethodRef {
        /// Class index of the owner
        class_index: u16,
        /// NameAndType index
        name_and_type_index: u16,
    },
    /// Interface method reference
    InterfaceMethodRef {
        /// Class index of the owner
        class_index: u16,
        /// NameAndType index
        name_and_type_index: u16,
    },
    /// Name and descriptor pair
    NameAndType {
        /// Utf8 index of the name
        name_index: u16,
        /// Utf8 index of the descriptor
        descriptor_index: u16,
    },
    /// Method handle
    MethodHandle {
        /// Handle kind (1 to 9)
        reference_kind: u8,
        /// Referenced member
        reference_index: u16,
    },
    /// Method type
    MethodType {
        /// Utf8 index of the descriptor
        descriptor_index: u16,
    },
    /// Dynamically computed constant
    Dynamic {
        /// Index into the bootstrap methods table
        bootstrap_method_attr_index: u16,
        /// NameAndType index
        name_and_type_index: u16,
    },
    /// Dynamically computed call site
    InvokeDynamic {
        /// Index into the bootstrap methods table
        bootstrap_method_attr_index: u16,
        /// NameAndType index
        name_and_type_index: u16,
    },
    /// Module
    Module {
        /// Utf8 index of the module name
        name_index: u16,
    },
    /// Package
    Package {
        /// Utf8 index of the package name
        name_index: u16,
    },
}

impl Constant {
    /// Pool tag, `None` for [`Constant::Unusable`]
    pub fn tag(&self) -> Option<ConstantTag> {
        Some(match self {
            Self::Unusable => return None,
            Self::Utf8(_) => ConstantTag::Utf8,
            Self::Integer(_) => ConstantTag::Integer,
            Self::Float(_) => ConstantTag::Float,
            Self::Long(_) => ConstantTag::Long,
            Self::Double(_) => ConstantTag::Double,
            Self::Class { .. } => ConstantTag::Class,
            Self::String { .. } => ConstantTag::String,
            Self::FieldRef { .. } => ConstantTag::FieldRef,
            Self::MethodRef { .. } => ConstantTag::MethodRef,
            Self::InterfaceMethodRef { .. } => ConstantTag::InterfaceMethodRef,
            Self::NameAndType { .. } => ConstantTag::NameAndType,
            Self::MethodHandle { .. } => ConstantTag::MethodHandle,
            Self::MethodType { .. } => ConstantTag::MethodType,
            Self::Dynamic { .. } => ConstantTag::Dynamic,
            Self::InvokeDynamic { .. } => ConstantTag::InvokeDynamic,
            Self::Module { .. } => ConstantTag::Module,
            Self::Package { .. } => ConstantTag::Package,
        })
    }

    /// Short kind name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unusable => "Unusable",
            Self::Utf8(_) => "Utf8",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Class { .. } => "Class",
            Self::String { .. } => "String",
            Self::FieldRef { .. } => "Fieldref",
            Self::MethodRef { .. } => "Methodref",
            Self::InterfaceMethodRef { .. } => "InterfaceMethodref",
            Self::NameAndType { .. } => "NameAndType",
            Self::MethodHandle { .. } => "MethodHandle",
            Self::MethodType { .. } => "MethodType",
            Self::Dynamic { .. } => "Dynamic",
            Self::InvokeDynamic { .. } => "InvokeDynamic",
            Self::Module { .. } => "Module",
            Self::Package { .. } => "Package",
        }
    }

    /// Whether this entry takes two pool slots
    #[inline]
    pub fn is_wide(&self) -> bool {
        matches!(self, Self::Long(_) | Self::Double(_))
    }

    /// Read one entry, tag byte included
    pub fn read(reader: &mut ByteReader<'_>, index: u16) -> Result<Self> {
        let byte = reader.u8()?;
        let tag = ConstantTag::from_u8(byte)
            .ok_or(ClassFileError::UnknownConstantTag { tag: byte, index })?;

        Ok(match tag {
            ConstantTag::Utf8 => {
                let len = usize::from(reader.u16()?);
                Self::Utf8(decode_modified_utf8(reader.bytes(len)?))
            }
            ConstantTag::Integer => Self::Integer(reader.u32()? as i32),
            ConstantTag::Float => Self::Float(f32::from_bits(reader.u32()?)),
            ConstantTag::Long => Self::Long(reader.u64()? as i64),
            ConstantTag::Double => Self::Double(f64::from_bits(reader.u64()?)),
            ConstantTag::Class => Self::Class {
                name_index: reader.u16()?,
            },
            ConstantTag::String => Self::String {
                string_index: reader.u16()?,
            },
            ConstantTag::FieldRef => Self::FieldRef {
                class_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            ConstantTag::MethodRef => Self::MethodRef {
                class_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            ConstantTag::InterfaceMethodRef => Self::InterfaceMethodRef {
                class_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            ConstantTag::NameAndType => Self::NameAndType {
                name_index: reader.u16()?,
                descriptor_index: reader.u16()?,
            },
            ConstantTag::MethodHandle => Self::MethodHandle {
                reference_kind: reader.u8()?,
                reference_index: reader.u16()?,
            },
            ConstantTag::MethodType => Self::MethodType {
                descriptor_index: reader.u16()?,
            },
            ConstantTag::Dynamic => Self::Dynamic {
                bootstrap_method_attr_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            ConstantTag::InvokeDynamic => Self::InvokeDynamic {
                bootstrap_method_attr_index: reader.u16()?,
                name_and_type_index: reader.u16()?,
            },
            ConstantTag::Module => Self::Module {
                name_index: reader.u16()?,
            },
            ConstantTag::Package => Self::Package {
                name_index: reader.u16()?,
            },
        })
    }
}

/// Decode modified UTF-8: `C0 80` is NUL and supplementary characters arrive
/// as two encoded surrogates. Malformed sequences become U+FFFD.
fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_owned();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let (unit, width) = match b {
            0x01..=0x7F => (u16::from(b), 1),
            0xC0..=0xDF if i + 1 < bytes.len() => (
                (u16::from(b & 0x1F) << 6) | u16::from(bytes[i + 1] & 0x3F),
                2,
            ),
            0xE0..=0xEF if i + 2 < bytes.len() => (
                (u16::from(b & 0x0F) << 12)
                    | (u16::from(bytes[i + 1] & 0x3F) << 6)
                    | u16::from(bytes[i + 2] & 0x3F),
                3,
            ),
            _ => (0xFFFD, 1),
        };
        units.push(unit);
        i += width;
    }
    String::from_utf16_lossy(&units)
}

/// A field or method reference with every index resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRef<'a> {
    /// Binary name of the owning class
    pub class: &'a str,
    /// Member name
    pub name: &'a str,
    /// Member descriptor
    pub descriptor: &'a str,
}

/// The constant pool of one class
///
/// Index 0 is never valid, and so is the slot after a long or double.
/// `size()` is the `constant_pool_count` of the class file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    /// Create a pool holding only slot 0
    pub fn new() -> Self {
        Self {
            entries: vec![Constant::Unusable],
        }
    }

    /// Read `count - 1` entries
    pub fn read(reader: &mut ByteReader<'_>, count: u16) -> Result<Self> {
        let mut pool = Self {
            entries: Vec::with_capacity(usize::from(count)),
        };
        pool.entries.push(Constant::Unusable);

        while pool.entries.len() < usize::from(count) {
            let index = pool.entries.len() as u16;
            let constant = Constant::read(reader, index)?;
            let wide = constant.is_wide();
            pool.entries.push(constant);
            if wide {
                pool.entries.push(Constant::Unusable);
            }
        }
        // a wide entry in the last slot pushes one past the declared count
        pool.entries.truncate(usize::from(count).max(1));

        tracing::debug!(target: "lava::classfile", count, "constant pool loaded");
        Ok(pool)
    }

    /// Append an entry, returning its index. Longs and doubles also take
    /// the following slot.
    pub fn push(&mut self, constant: Constant) -> u16 {
        let index = self.entries.len() as u16;
        let wide = constant.is_wide();
        self.entries.push(constant);
        if wide {
            self.entries.push(Constant::Unusable);
        }
        index
    }

    /// Append a Utf8 entry
    pub fn push_utf8(&mut self, text: &str) -> u16 {
        self.push(Constant::Utf8(text.to_owned()))
    }

    /// Append a Class entry and the Utf8 entry naming it
    pub fn push_class(&mut self, name: &str) -> u16 {
        let name_index = self.push_utf8(name);
        self.push(Constant::Class { name_index })
    }

    /// Append a String entry and the Utf8 entry holding its text
    pub fn push_string(&mut self, text: &str) -> u16 {
        let string_index = self.push_utf8(text);
        self.push(Constant::String { string_index })
    }

    /// Append a NameAndType entry and its two Utf8 entries
    pub fn push_name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.push_utf8(name);
        let descriptor_index = self.push_utf8(descriptor);
        self.push(Constant::NameAndType {
            name_index,
            descriptor_index,
        })
    }

    /// Number of slots, slot 0 included
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Entry at `index`
    #[inline]
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(usize::from(index))
    }

    /// Tag of the entry at `index`
    pub fn tag(&self, index: u16) -> Option<ConstantTag> {
        self.get(index).and_then(Constant::tag)
    }

    /// Every usable entry with its index
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, c)| !matches!(c, Constant::Unusable))
            .map(|(i, c)| (i as u16, c))
    }

    fn entry(&self, index: u16) -> Result<&Constant> {
        match self.get(index) {
            Some(Constant::Unusable) | None => Err(ClassFileError::BadIndex(index)),
            Some(constant) => Ok(constant),
        }
    }

    fn wrong_kind(index: u16, expected: &'static str, found: &Constant) -> ClassFileError {
        ClassFileError::WrongKind {
            index,
            expected,
            found: found.kind(),
        }
    }

    /// Text of a Utf8 entry
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.entry(index)? {
            Constant::Utf8(text) => Ok(text),
            other => Err(Self::wrong_kind(index, "Utf8", other)),
        }
    }

    /// Binary name of a Class entry
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.entry(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            other => Err(Self::wrong_kind(index, "Class", other)),
        }
    }

    /// Text of a String entry
    pub fn string_value(&self, index: u16) -> Result<&str> {
        match self.entry(index)? {
            Constant::String { string_index } => self.utf8(*string_index),
            other => Err(Self::wrong_kind(index, "String", other)),
        }
    }

    /// Name and descriptor of a NameAndType entry
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        match self.entry(index)? {
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            other => Err(Self::wrong_kind(index, "NameAndType", other)),
        }
    }

    /// Resolve a Fieldref, Methodref or InterfaceMethodref entry
    pub fn member_ref(&self, index: u16) -> Result<MemberRef<'_>> {
        match self.entry(index)? {
            Constant::FieldRef {
                class_index,
                name_and_type_index,
            }
            | Constant::MethodRef {
                class_index,
                name_and_type_index,
            }
            | Constant::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => {
                let class = self.class_name(*class_index)?;
                let (name, descriptor) = self.name_and_type(*name_and_type_index)?;
                Ok(MemberRef {
                    class,
                    name,
                    descriptor,
                })
            }
            other => Err(Self::wrong_kind(index, "member reference", other)),
        }
    }

    /// One-line rendering of an entry, names resolved where possible
    pub fn describe(&self, index: u16) -> String {
        let Some(constant) = self.get(index) else {
            return format!("#{index} <out of range>");
        };
        let detail = match constant {
            Constant::Utf8(text) => format!("{text:?}"),
            Constant::Integer(v) => v.to_string(),
            Constant::Float(v) => v.to_string(),
            Constant::Long(v) => v.to_string(),
            Constant::Double(v) => v.to_string(),
            Constant::Class { .. } => self.class_name(index).unwrap_or("?").to_owned(),
            Constant::String { .. } => format!("{:?}", self.string_value(index).unwrap_or("?")),
            Constant::NameAndType { .. } => match self.name_and_type(index) {
                Ok((name, descriptor)) => format!("{name} {descriptor}"),
                Err(_) => "?".to_owned(),
            },
            Constant::FieldRef { .. }
            | Constant::MethodRef { .. }
            | Constant::InterfaceMethodRef { .. } => match self.member_ref(index) {
                Ok(m) => format!("{}.{} {}", m.class, m.name, m.descriptor),
                Err(_) => "?".to_owned(),
            },
            _ => String::new(),
        };
        format!("#{index} {} {detail}", constant.kind())
            .trim_end()
            .to_owned()
    }
}
