//! Hash tables with interchangeable backends behind one contract and one hash function.
//!
//! Every backend hashes keys with the same [`hashing::hashers::FairHasher`], so differences
//! between them come from layout and probing alone. [`Table::raw_hash`] exposes the value
//! each backend places a key by.
//!
//! # Examples
//!
//! ```rust
//! use fairtable::{AnyTable, Backend};
//! use fairtable_core::{Table, Val4};
//!
//! for backend in Backend::ALL {
//!     let mut table = AnyTable::<u64, Val4>::create(backend);
//!     table.insert(1, Val4::filled(b'A')).unwrap();
//!     assert_eq!(table.get(&1), Some(&Val4::filled(b'A')));
//! }
//! ```
pub mod cursor;
pub mod handle;
pub mod hashing;
pub mod memory;
pub mod robin;
pub mod swiss;
pub mod tomb;
mod utils;
pub mod variants;

pub use fairtable_core::{
    ByteKey, Cursor, HashEngine, HashKey, NewTable, Result, SetTable, Slot, SlotValue, Table,
    TableConfig, TableError, TableKey, Val256, Val4, Val56, Val64,
};
pub use handle::{AnyCursor, AnyTable, Backend};
pub use hashing::hashers::FairHasher;
