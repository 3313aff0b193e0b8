//! Attributes of classes, fields, methods and code
//!
//! Every attribute is read from a sub-reader bounded by its declared length,
//! so an attribute this reader does not model is kept as raw bytes and a
//! body that disagrees with its length is reported instead of desynchronising
//! the rest of the file.

use serde::Serialize;

use crate::constant::ConstantPool;
use crate::error::{ClassFileError, Result};
use crate::reader::ByteReader;

/// One row of a code attribute's exception table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExceptionHandler {
    /// First covered pc
    pub start_pc: u16,
    /// First pc past the covered range
    pub end_pc: u16,
    /// Handler entry point
    pub handler_pc: u16,
    /// Class index of the caught type, 0 for any
    pub catch_type: u16,
}

/// One row of a `LineNumberTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineNumber {
    /// First pc of the line
    pub start_pc: u16,
    /// Source line
    pub line: u16,
}

/// One row of an `InnerClasses` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InnerClass {
    /// Class index of the inner class
    pub inner_class_info_index: u16,
    /// Class index of the outer class, 0 if none
    pub outer_class_info_index: u16,
    /// Utf8 index of the simple name, 0 if anonymous
    pub inner_name_index: u16,
    /// Declared access flags
    pub inner_class_access_flags: u16,
}

/// Body of a `Code` attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeAttribute {
    /// Operand stack depth
    pub max_stack: u16,
    /// Local variable slots
    pub max_locals: u16,
    /// Raw bytecode
    pub code: Vec<u8>,
    /// Exception table
    pub exception_table: Vec<ExceptionHandler>,
    /// Nested attributes
    pub attributes: Vec<Attribute>,
}

/// A decoded attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Attribute {
    /// Initial value of a static field
    ConstantValue {
        /// Pool index of the value
        index: u16,
    },
    /// Method body
    Code(CodeAttribute),
    /// Checked exceptions, as class indices
    Exceptions(Vec<u16>),
    /// Bytecode to source line mapping
    LineNumberTable(Vec<LineNumber>),
    /// Source file name
    SourceFile {
        /// Utf8 index of the file name
        index: u16,
    },
    /// Nested class records
    InnerClasses(Vec<InnerClass>),
    /// Enclosing method of a local or anonymous class
    EnclosingMethod {
        /// Class index of the enclosing class
        class_index: u16,
        /// NameAndType index of the method, 0 if none
        method_index: u16,
    },
    /// Compiler-generated member
    Synthetic,
    /// Generic signature
    Signature {
        /// Utf8 index of the signature
        index: u16,
    },
    /// Deprecated member
    Deprecated,
    /// Any other attribute, kept verbatim
    Other {
        /// Attribute name
        name: String,
        /// Body bytes
        data: Vec<u8>,
    },
}

impl Attribute {
    /// Attribute name as written in a class file
    pub fn name(&self) -> &str {
        match self {
            Self::ConstantValue { .. } => "ConstantValue",
            Self::Code(_) => "Code",
            Self::Exceptions(_) => "Exceptions",
            Self::LineNumberTable(_) => "LineNumberTable",
            Self::SourceFile { .. } => "SourceFile",
            Self::InnerClasses(_) => "InnerClasses",
            Self::EnclosingMethod { .. } => "EnclosingMethod",
            Self::Synthetic => "Synthetic",
            Self::Signature { .. } => "Signature",
            Self::Deprecated => "Deprecated",
            Self::Other { name, .. } => name,
        }
    }

    /// Read a `u2` count followed by that many attributes
    pub fn read_table(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Vec<Self>> {
        let count = reader.u16()?;
        (0..count).map(|_| Self::read(reader, pool)).collect()
    }

    /// Read one attribute, header included
    pub fn read(reader: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Self> {
        let name_index = reader.u16()?;
        let len = reader.u32()? as usize;
        let name = pool.utf8(name_index)?;
        let mut body = ByteReader::new(reader.bytes(len)?);

        let attribute = Self::read_body(name, &mut body, pool).map_err(|err| match err {
            ClassFileError::UnexpectedEnd { .. } => {
                malformed(name, format!("body shorter than its layout ({len} bytes)"))
            }
            other => other,
        })?;
        if !body.is_empty() {
            return Err(malformed(name, format!("{} trailing bytes", body.remaining())));
        }

        tracing::trace!(target: "lava::classfile", name, len, "attribute read");
        Ok(attribute)
    }

    fn read_body(name: &str, body: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Self> {
        Ok(match name {
            "ConstantValue" => Self::ConstantValue { index: body.u16()? },
            "Code" => Self::Code(CodeAttribute::read(body, pool)?),
            "Exceptions" => Self::Exceptions(body.u16_table()?),
            "LineNumberTable" => {
                let count = body.u16()?;
                let rows = (0..count)
                    .map(|_| -> Result<LineNumber> {
                        Ok(LineNumber {
                            start_pc: body.u16()?,
                            line: body.u16()?,
                        })
                    })
                    .collect::<Result<_>>()?;
                Self::LineNumberTable(rows)
            }
            "SourceFile" => Self::SourceFile { index: body.u16()? },
            "InnerClasses" => {
                let count = body.u16()?;
                let rows = (0..count)
                    .map(|_| -> Result<InnerClass> {
                        Ok(InnerClass {
                            inner_class_info_index: body.u16()?,
                            outer_class_info_index: body.u16()?,
                            inner_name_index: body.u16()?,
                            inner_class_access_flags: body.u16()?,
                        })
                    })
                    .collect::<Result<_>>()?;
                Self::InnerClasses(rows)
            }
            "EnclosingMethod" => Self::EnclosingMethod {
                class_index: body.u16()?,
                method_index: body.u16()?,
            },
            "Synthetic" => Self::Synthetic,
            "Signature" => Self::Signature { index: body.u16()? },
            "Deprecated" => Self::Deprecated,
            _ => {
                tracing::debug!(target: "lava::classfile", name, len = body.remaining(), "attribute kept as raw bytes");
                Self::Other {
                    name: name.to_owned(),
                    data: body.bytes(body.remaining())?.to_vec(),
                }
            }
        })
    }
}

fn malformed(name: &str, reason: String) -> ClassFileError {
    ClassFileError::MalformedAttribute {
        name: name.to_owned(),
        reason,
    }
}

impl CodeAttribute {
    fn read(body: &mut ByteReader<'_>, pool: &ConstantPool) -> Result<Self> {
        let max_stack = body.u16()?;
        let max_locals = body.u16()?;
        let code_len = body.u32()? as usize;
        let code = body.bytes(code_len)?.to_vec();
        let handlers = body.u16()?;
        let exception_table = (0..handlers)
            .map(|_| -> Result<ExceptionHandler> {
                Ok(ExceptionHandler {
                    start_pc: body.u16()?,
                    end_pc: body.u16()?,
                    handler_pc: body.u16()?,
                    catch_type: body.u16()?,
                })
            })
            .collect::<Result<_>>()?;
        let attributes = Attribute::read_table(body, pool)?;
        Ok(Self {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }

    /// Source line for a pc, if a line number table is present
    pub fn line_for(&self, pc: u16) -> Option<u16> {
        self.attributes.iter().find_map(|attr| match attr {
            Attribute::LineNumberTable(rows) => rows
                .iter()
                .filter(|row| row.start_pc <= pc)
                .max_by_key(|row| row.start_pc)
                .map(|row| row.line),
            _ => None,
        })
    }
}
