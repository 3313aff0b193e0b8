//! Constant pool references to symbol codes
//!
//! Translated bytecode never carries pool indices. Each operand that pointed
//! into the pool is replaced by the [`Ident`] under which the referenced thing
//! lives at run time: a synthetic key for loaded constants, the member name for
//! members of the class being compiled, or a host built-in.

use lava_classfile::{Constant, ConstantPool};
use lava_vm_core::Ident;
use lava_vm_core::symbols;

/// Offset added to a pool index to form its synthetic key
pub const SYNTHETIC_KEY_BASE: u32 = 9000;

/// Key under which the constant at `index` is stored in the class table:
/// the code of the decimal text of `9000 + index`.
///
/// This shares the symbol space with member names. `"9001"` and `"U__J"` have
/// the same code, so a member named like that would collide with a constant.
/// Indices from 1000 up give five-digit text, which is cut to four characters,
/// so those keys also collide with each other.
pub fn synthetic_key(index: u16) -> Ident {
    Ident::from_name(&(SYNTHETIC_KEY_BASE + u32::from(index)).to_string())
}

/// Host behaviour reachable from translated bytecode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `java/lang/Object.<init>`
    ObjectInit,
    /// `java/lang/System.out`
    SystemOut,
    /// `PrintStream.println(String)`
    PrintlnString,
    /// `PrintStream.println(int)`
    PrintlnInt,
    /// `PrintStream.println(float)`
    PrintlnFloat,
    /// `Integer.parseInt`
    ParseInt,
    /// `StringBuilder.<init>`
    StringBuilderInit,
    /// `StringBuilder.append(String)`
    StringBuilderAppendString,
    /// `StringBuilder.append(int)`
    StringBuilderAppendInt,
    /// `StringBuilder.toString`
    StringBuilderToString,
    /// The `java/lang/StringBuilder` class itself
    StringBuilderClass,
}

const STRING_BUILDER: &str = "java/lang/StringBuilder";
const PRINT_STREAM: &str = "java/io/PrintStream";

/// `(class, name, descriptor)`; a `None` descriptor matches any overload
const METHODS: &[(&str, &str, Option<&str>, Builtin)] = &[
    ("java/lang/Object", "<init>", None, Builtin::ObjectInit),
    (PRINT_STREAM, "println", Some("(Ljava/lang/String;)V"), Builtin::PrintlnString),
    (PRINT_STREAM, "println", Some("(I)V"), Builtin::PrintlnInt),
    (PRINT_STREAM, "println", Some("(F)V"), Builtin::PrintlnFloat),
    ("java/lang/Integer", "parseInt", None, Builtin::ParseInt),
    (STRING_BUILDER, "<init>", None, Builtin::StringBuilderInit),
    (
        STRING_BUILDER,
        "append",
        Some("(Ljava/lang/String;)Ljava/lang/StringBuilder;"),
        Builtin::StringBuilderAppendString,
    ),
    (
        STRING_BUILDER,
        "append",
        Some("(I)Ljava/lang/StringBuilder;"),
        Builtin::StringBuilderAppendInt,
    ),
    (STRING_BUILDER, "toString", None, Builtin::StringBuilderToString),
];

impl Builtin {
    /// Reserved code of this built-in
    pub const fn ident(self) -> Ident {
        match self {
            Self::ObjectInit => symbols::OBJINIT,
            Self::SystemOut => symbols::SYSOUT,
            Self::PrintlnString => symbols::PRNS,
            Self::PrintlnInt => symbols::PRNI,
            Self::PrintlnFloat => symbols::PRNF,
            Self::ParseInt => symbols::PARSEINT,
            Self::StringBuilderInit => symbols::SB_INIT,
            Self::StringBuilderAppendString => symbols::SB_APPEND_STR,
            Self::StringBuilderAppendInt => symbols::SB_APPEND_I,
            Self::StringBuilderToString => symbols::SB_TOSTR,
            Self::StringBuilderClass => symbols::CLASS_SB,
        }
    }

    /// Built-in for a class reference
    pub fn for_class(class: &str) -> Option<Self> {
        (class == STRING_BUILDER).then_some(Self::StringBuilderClass)
    }

    /// Built-in for a field of another class
    pub fn for_field(class: &str, name: &str) -> Option<Self> {
        (class == "java/lang/System" && name == "out").then_some(Self::SystemOut)
    }

    /// Built-in for a method of another class
    pub fn for_method(class: &str, name: &str, descriptor: &str) -> Option<Self> {
        METHODS
            .iter()
            .find(|(c, n, d, _)| *c == class && *n == name && d.is_none_or(|d| d == descriptor))
            .map(|&(_, _, _, builtin)| builtin)
    }
}

/// Symbol code for the pool entry at `index`, as seen from `this_class`.
///
/// Unresolvable entries log an error and give [`Ident::NONE`].
pub fn lookup_constant(pool: &ConstantPool, index: u16, this_class: &str) -> Ident {
    let Some(constant) = pool.get(index) else {
        tracing::error!(target: "lava::compiler", index, "constant index out of range");
        return Ident::NONE;
    };

    match constant {
        Constant::String { .. } | Constant::Integer(_) | Constant::Float(_) => synthetic_key(index),

        Constant::Class { .. } => {
            let name = match pool.class_name(index) {
                Ok(name) => name,
                Err(err) => {
                    tracing::error!(target: "lava::compiler", index, %err, "unreadable class constant");
                    return Ident::NONE;
                }
            };
            match Builtin::for_class(name) {
                Some(builtin) => builtin.ident(),
                None => {
                    tracing::warn!(
                        target: "lava::compiler",
                        class = name,
                        "class has no built-in, using its constant key; may need enhancement"
                    );
                    synthetic_key(index)
                }
            }
        }

        Constant::FieldRef { .. } => {
            let member = match pool.member_ref(index) {
                Ok(member) => member,
                Err(err) => {
                    tracing::error!(target: "lava::compiler", index, %err, "unreadable field reference");
                    return Ident::NONE;
                }
            };
            if member.class == this_class {
                return Ident::from_name(member.name);
            }
            match Builtin::for_field(member.class, member.name) {
                Some(builtin) => builtin.ident(),
                None => {
                    tracing::error!(
                        target: "lava::compiler",
                        class = member.class,
                        field = member.name,
                        "unable to resolve field reference"
                    );
                    Ident::NONE
                }
            }
        }

        Constant::MethodRef { .. } => {
            let member = match pool.member_ref(index) {
                Ok(member) => member,
                Err(err) => {
                    tracing::error!(target: "lava::compiler", index, %err, "unreadable method reference");
                    return Ident::NONE;
                }
            };
            if member.class == this_class {
                return Ident::from_name(member.name);
            }
            match Builtin::for_method(member.class, member.name, member.descriptor) {
                Some(builtin) => builtin.ident(),
                None => {
                    tracing::error!(
                        target: "lava::compiler",
                        class = member.class,
                        method = member.name,
                        descriptor = member.descriptor,
                        "unable to resolve method reference"
                    );
                    Ident::NONE
                }
            }
        }

        other => {
            tracing::error!(target: "lava::compiler", index, kind = other.kind(), "constant cannot be referenced from code");
            Ident::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_key() {
        assert_eq!(synthetic_key(1), Ident::from_name("9001"));
        assert_eq!(synthetic_key(42), Ident::from_name("9042"));
        // "10000" and "10001" both cut to "1000"
        assert_eq!(synthetic_key(1000), synthetic_key(1001));
    }

    #[test]
    fn test_builtin_idents() {
        assert_eq!(Builtin::ObjectInit.ident(), Ident(0xFE01));
        assert_eq!(Builtin::StringBuilderClass.ident(), Ident(0xFE0B));
    }

    #[test]
    fn test_method_overloads() {
        assert_eq!(
            Builtin::for_method(PRINT_STREAM, "println", "(I)V"),
            Some(Builtin::PrintlnInt)
        );
        assert_eq!(Builtin::for_method(PRINT_STREAM, "println", "(J)V"), None);
        assert_eq!(
            Builtin::for_method("java/lang/Integer", "parseInt", "(Ljava/lang/String;I)I"),
            Some(Builtin::ParseInt)
        );
        assert_eq!(Builtin::for_method("java/lang/Math", "abs", "(I)I"), None);
    }

    #[test]
    fn test_class_and_field() {
        assert_eq!(Builtin::for_class(STRING_BUILDER), Some(Builtin::StringBuilderClass));
        assert_eq!(Builtin::for_class("java/lang/String"), None);
        assert_eq!(Builtin::for_field("java/lang/System", "out"), Some(Builtin::SystemOut));
        assert_eq!(Builtin::for_field("java/lang/System", "err"), None);
    }
}
