//! Method body translation
//!
//! The translated body is one word per input byte, prefixed by the method's
//! symbol code and parameter count:
//!
//! ```text
//! [method][params][b0][b1] ... [b(n-1)]
//! ```
//!
//! Only instructions that index the constant pool change. `ldc #i` becomes
//! `[ldc][key]`; the two-byte forms become `[op][key][nop]`, keeping every
//! other instruction at its original offset + 2.

use lava_classfile::ConstantPool;
use lava_vm_core::Ident;

use crate::lookup::lookup_constant;

/// JVM opcodes that reference the constant pool
#[allow(missing_docs)]
pub mod opcode {
    pub const NOP: u8 = 0x00;
    pub const LDC: u8 = 0x12;
    pub const GETSTATIC: u8 = 0xB2;
    pub const PUTSTATIC: u8 = 0xB3;
    pub const GETFIELD: u8 = 0xB4;
    pub const PUTFIELD: u8 = 0xB5;
    pub const INVOKEVIRTUAL: u8 = 0xB6;
    pub const INVOKESPECIAL: u8 = 0xB7;
    pub const INVOKESTATIC: u8 = 0xB8;
    pub const NEW: u8 = 0xBB;
    pub const ANEWARRAY: u8 = 0xBD;
    pub const CHECKCAST: u8 = 0xC0;
    pub const INSTANCEOF: u8 = 0xC1;
}

/// Width of the pool index operand, for the opcodes that have one
pub fn pool_operand_width(op: u8) -> Option<usize> {
    use opcode::*;
    match op {
        LDC => Some(1),
        ANEWARRAY | CHECKCAST | GETFIELD | GETSTATIC | INSTANCEOF | INVOKESPECIAL
        | INVOKESTATIC | INVOKEVIRTUAL | NEW | PUTFIELD | PUTSTATIC => Some(2),
        _ => None,
    }
}

/// Translate one method body.
///
/// Operands are not decoded beyond pool indices: a byte that happens to equal
/// a pool opcode inside another instruction's operands is treated as an
/// opcode.
pub fn translate_code(
    pool: &ConstantPool,
    this_class: &str,
    method: Ident,
    params: u16,
    code: &[u8],
) -> Vec<u16> {
    let mut out = Vec::with_capacity(code.len() + 2);
    out.push(method.value());
    out.push(params);

    let mut i = 0;
    while i < code.len() {
        let op = code[i];
        let Some(width) = pool_operand_width(op) else {
            out.push(u16::from(op));
            i += 1;
            continue;
        };

        if i + width >= code.len() {
            tracing::error!(
                target: "lava::compiler",
                method = %method,
                pc = i,
                op,
                "operand runs past end of code; copied unchanged"
            );
            out.extend(code[i..].iter().map(|&b| u16::from(b)));
            break;
        }

        let index = match width {
            1 => u16::from(code[i + 1]),
            _ => u16::from_be_bytes([code[i + 1], code[i + 2]]),
        };
        let key = lookup_constant(pool, index, this_class);
        out.push(u16::from(op));
        out.push(key.value());
        if width == 2 {
            out.push(u16::from(opcode::NOP));
        }
        i += 1 + width;
    }

    out
}

/// Number of parameters in a method descriptor. Longs and doubles count once.
///
/// A malformed descriptor logs a warning and gives the count read so far.
pub fn descriptor_param_count(descriptor: &str) -> u16 {
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        tracing::warn!(target: "lava::compiler", descriptor, "not a method descriptor");
        return 0;
    }

    let mut count = 0;
    let mut i = 1;
    loop {
        match bytes.get(i) {
            Some(b')') => return count,
            Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => i += 1,
            Some(b'[') => {
                i += 1;
                continue;
            }
            Some(b'L') => match bytes[i..].iter().position(|&b| b == b';') {
                Some(end) => i += end + 1,
                None => break,
            },
            _ => break,
        }
        count += 1;
    }

    tracing::warn!(target: "lava::compiler", descriptor, "malformed method descriptor");
    count
}
