//! Reserved symbols
//!
//! Codes below 256 are raw bytes and must match the JVM opcodes they stand for.
//! The alphabetic tags are exactly `Ident::from_name` of their own names.
//! Host built-ins live in `0xFE01..=0xFE0C`. A name like `"FE01"` encodes to
//! the same code; built-ins are only produced by constant lookup and never
//! stored in a class table.

use crate::ident::Ident;

/// No value
pub const NONE: Ident = Ident::NONE;
/// Nil
pub const NIL: Ident = Ident::NIL;

/// Class table
pub const CLAS: Ident = Ident(50344);
/// Class initializer
pub const CLIN: Ident = Ident(50229);
/// Class name, a string
pub const CNAM: Ident = Ident(50597);
/// Float cell
pub const FLOT: Ident = Ident(0xF46D);
/// Instance initializer
pub const INIT: Ident = Ident(13629);
/// Int cell
pub const INTG: Ident = Ident(13777);
/// Entry point
pub const MAIN: Ident = Ident(23093);
/// Translated method body
pub const METH: Ident = Ident(24274);
/// String
pub const STRG: Ident = Ident(36209);
/// Generic word array
pub const ARRY: Ident = Ident(42867);

/// `java/lang/Object."<init>":()V`
pub const OBJINIT: Ident = Ident(0xFE01);
/// `java/lang/System.out`
pub const SYSOUT: Ident = Ident(0xFE02);
/// `java/io/PrintStream.println:(Ljava/lang/String;)V`
pub const PRNS: Ident = Ident(0xFE03);
/// `java/io/PrintStream.println:(I)V`
pub const PRNI: Ident = Ident(0xFE04);
/// `java/io/PrintStream.println:(F)V`
pub const PRNF: Ident = Ident(0xFE05);
/// `java/lang/Integer.parseInt:(Ljava/lang/String;)I`
pub const PARSEINT: Ident = Ident(0xFE06);
/// `java/lang/StringBuilder."<init>":()V`
pub const SB_INIT: Ident = Ident(0xFE07);
/// `java/lang/StringBuilder.append:(Ljava/lang/String;)Ljava/lang/StringBuilder;`
pub const SB_APPEND_STR: Ident = Ident(0xFE08);
/// `java/lang/StringBuilder.append:(I)Ljava/lang/StringBuilder;`
pub const SB_APPEND_I: Ident = Ident(0xFE09);
/// `java/lang/StringBuilder.toString:()Ljava/lang/String;`
pub const SB_TOSTR: Ident = Ident(0xFE0A);
/// The class `java/lang/StringBuilder`
pub const CLASS_SB: Ident = Ident(0xFE0B);
/// A `StringBuilder` instance
pub const SB_OBJ: Ident = Ident(0xFE0C);
