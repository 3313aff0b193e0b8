//! # Lava VM Compiler
//!
//! Loads one class into a Lava [`Heap`](lava_vm_heap::Heap).
//!
//! ## Pipeline
//!
//! 1. Create the class table, sized from the constant pool
//! 2. Store the class name under `CNAM`
//! 3. Store every string, class, int and float constant under its synthetic key
//! 4. Bind static fields to their constant values (or nil)
//! 5. Translate method bodies and store them under the method name
//!
//! Every step is fail-soft: problems are logged and the step carries on.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod compiler;
pub mod lookup;
pub mod translate;

pub use compiler::ClassCompiler;
pub use lookup::{Builtin, lookup_constant, synthetic_key};
pub use translate::{descriptor_param_count, translate_code};
