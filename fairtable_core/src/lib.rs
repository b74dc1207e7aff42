//! Core trait and type declarations shared by every table backend.
pub mod config;
pub mod error;
pub mod hashing;
pub mod key;
pub mod slot;
pub mod table;

pub use config::TableConfig;
pub use error::{Result, TableError};
pub use hashing::HashEngine;
pub use key::{ByteKey, HashKey, TableKey};
pub use slot::{Slot, SlotValue, Val256, Val4, Val56, Val64};
pub use table::{Cursor, NewTable, SetTable, Table};
