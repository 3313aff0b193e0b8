//! # Lava VM Heap
//!
//! The working memory of the Lava VM: one flat array of 16-bit words.
//!
//! ## Design
//!
//! - **Bump allocation**: a single cursor that only moves forward, nothing is reclaimed
//! - **Tagged cells**: every object starts with an [`Ident`](lava_vm_core::Ident) naming its kind
//! - **Offset references**: a [`Ref`] is `offset + 256`, so raw bytes, nil and addresses never overlap
//! - **Fixed tables**: open addressing with a small probe budget and no resizing

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cell;
pub mod heap;
pub mod table;

pub use cell::Ref;
pub use heap::{Heap, HeapConfig, HeapStats};
pub use table::{OpenTable, Probe, TableWord};
