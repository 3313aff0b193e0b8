//! # Lava VM Core
//!
//! Value encodings shared by every stage of the Lava toolchain.
//!
//! ## Encodings
//!
//! - **Num48**: one 48-bit fixed-point representation for both ints and floats,
//!   three base-64000 digits with complement-style negatives
//! - **Ident**: a lossy 16-bit symbol code built from the first four characters
//!   of a name
//! - **symbols**: the reserved Idents used as object tags and host built-ins

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ident;
pub mod num48;
pub mod symbols;

pub use ident::{Ident, IdentVariant};
pub use num48::Num48;
