//! The variant matrix: every backend crossed with every key kind and value kind.
//!
//! Statically, each backend has a module of type aliases named `{Key}{Value}`, e.g.
//! [`tomb::U64Val4`] or [`robin::StrFairVoid`]. Dynamically, [`open`] builds any variant from
//! its `{backend}_{key}_{value}` name, e.g. `"swiss_strfair_val56"`.
mod registry;
pub use registry::*;

macro_rules! variant_aliases {
    ($(#[$attr:meta])* $module:ident, $Table:ident) => {
        $(#[$attr])*
        pub mod $module {
            use crate::$module::$Table;
            use fairtable_core::{Val256, Val4, Val56, Val64};

            pub type U16Void = $Table<u16, ()>;
            pub type U16Val4 = $Table<u16, Val4>;
            pub type U16Val56 = $Table<u16, Val56>;
            pub type U16Val64 = $Table<u16, Val64>;
            pub type U16Val256 = $Table<u16, Val256>;

            pub type U32Void = $Table<u32, ()>;
            pub type U32Val4 = $Table<u32, Val4>;
            pub type U32Val56 = $Table<u32, Val56>;
            pub type U32Val64 = $Table<u32, Val64>;
            pub type U32Val256 = $Table<u32, Val256>;

            pub type U64Void = $Table<u64, ()>;
            pub type U64Val4 = $Table<u64, Val4>;
            pub type U64Val56 = $Table<u64, Val56>;
            pub type U64Val64 = $Table<u64, Val64>;
            pub type U64Val256 = $Table<u64, Val256>;

            pub type StrVoid = $Table<Box<[u8]>, ()>;
            pub type StrVal4 = $Table<Box<[u8]>, Val4>;
            pub type StrVal56 = $Table<Box<[u8]>, Val56>;
            pub type StrVal64 = $Table<Box<[u8]>, Val64>;
            pub type StrVal256 = $Table<Box<[u8]>, Val256>;

            pub type StrFairVoid<'k> = $Table<&'k [u8], ()>;
            pub type StrFairVal4<'k> = $Table<&'k [u8], Val4>;
            pub type StrFairVal56<'k> = $Table<&'k [u8], Val56>;
            pub type StrFairVal64<'k> = $Table<&'k [u8], Val64>;
            pub type StrFairVal256<'k> = $Table<&'k [u8], Val256>;
        }
    };
}

variant_aliases!(
    /// Aliases over [`crate::swiss::SwissTable`].
    swiss,
    SwissTable
);
variant_aliases!(
    /// Aliases over [`crate::tomb::TombTable`].
    tomb,
    TombTable
);
variant_aliases!(
    /// Aliases over [`crate::robin::RobinTable`].
    robin,
    RobinTable
);

#[cfg(test)]
mod tests {
    use super::*;
    use fairtable_core::{NewTable, SetTable, Table, Val256, Val4};

    #[test]
    fn test_aliases_are_usable() {
        let mut table = tomb::U64Val4::create();
        table.insert(9, Val4::filled(1)).unwrap();
        assert_eq!(table.get(&9), Some(&Val4::filled(1)));

        let buffer = b"borrowed".to_vec();
        let mut table = robin::StrFairVoid::create();
        table.insert_key(&buffer[..3]).unwrap();
        assert!(table.contains(b"bor"));

        let mut table = swiss::StrVal256::create();
        table.insert(b"owned"[..].into(), Default::default()).unwrap();
        let entry_size = std::mem::size_of::<(Box<[u8]>, Val256)>();
        assert!(table.memory_footprint() >= table.bucket_count() * entry_size + 5);
    }
}
