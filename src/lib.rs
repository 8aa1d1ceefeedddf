//! Storage-layout core for the Xylem XML database engine.
//!
//! This crate owns the value layout of the heap file: the codecs that turn
//! heterogeneous node values (integers, short strings, whitespace runs,
//! long text) into compact binary forms, and the free-space registry that
//! recycles byte ranges when values are deleted or replaced. The
//! surrounding table/row engine decides *when* to call in and performs all
//! file I/O; nothing here touches the disk.
//!
//! # Design
//!
//! - **Inline first**: [`inline::pack`] places small values directly in the
//!   64-bit offset word; only values it declines go to the heap.
//! - **Compression is optional**: [`compress::pack`] returns the input
//!   unchanged unless coding makes it strictly smaller; the
//!   [`compress::COMPRESS`] flag records which branch was stored.
//! - **Best-fit reuse**: [`FreeSlots`] hands out the smallest registered
//!   freed range that fits and re-coalesces adjacent ranges after every
//!   free, so fragmentation stays bounded.
//! - **Self-describing lengths**: the [`varint`] tier encoding underlies
//!   every length and offset field and supports skipping without decoding.
//! - **Single-writer**: all structures are plain single-threaded data
//!   structures; the owning engine serializes mutation.
//!
//! # Example
//!
//! ```
//! use xylem_db_layout::{inline, compress, FreeSlots};
//!
//! let mut free = FreeSlots::new();
//! let token = b"some longer element text that will not fit inline";
//! assert_eq!(inline::pack(token), None);
//! let bytes = compress::pack(token);
//! let offset = free.get(bytes.len() as u32, 4096).unwrap();
//! # assert_eq!(offset, 4096);
//! ```

pub mod bitset;
pub mod compress;
pub mod error;
pub mod free_slots;
pub mod inline;
pub mod varint;

pub use bitset::BitSet;
pub use error::{LayoutError, Result};
pub use free_slots::FreeSlots;
pub use varint::VarIntBuffer;
