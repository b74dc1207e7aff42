//! Runtime construction of variants by name, behind a byte-oriented object-safe trait.
use crate::handle::{AnyTable, Backend};
use fairtable_core::{
    ByteKey, Result, SlotValue, Table, TableConfig, TableError, Val256, Val4, Val56, Val64,
};
use std::marker::PhantomData;

/// Key kinds of the variant matrix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum KeyKind {
    U16,
    U32,
    U64,
    /// Owning byte span.
    Str,
    /// Borrowing byte span.
    StrFair,
}

impl KeyKind {
    pub const ALL: [KeyKind; 5] = [
        KeyKind::U16,
        KeyKind::U32,
        KeyKind::U64,
        KeyKind::Str,
        KeyKind::StrFair,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            KeyKind::U16 => "u16",
            KeyKind::U32 => "u32",
            KeyKind::U64 => "u64",
            KeyKind::Str => "str",
            KeyKind::StrFair => "strfair",
        }
    }
}

/// Value kinds of the variant matrix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ValueKind {
    Void,
    Val4,
    Val56,
    Val64,
    Val256,
}

impl ValueKind {
    pub const ALL: [ValueKind; 5] = [
        ValueKind::Void,
        ValueKind::Val4,
        ValueKind::Val56,
        ValueKind::Val64,
        ValueKind::Val256,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::Val4 => "val4",
            ValueKind::Val56 => "val56",
            ValueKind::Val64 => "val64",
            ValueKind::Val256 => "val256",
        }
    }

    /// Bytes a value of this kind occupies.
    pub const fn width(self) -> usize {
        match self {
            ValueKind::Void => 0,
            ValueKind::Val4 => Val4::WIDTH,
            ValueKind::Val56 => Val56::WIDTH,
            ValueKind::Val64 => Val64::WIDTH,
            ValueKind::Val256 => Val256::WIDTH,
        }
    }
}

/// A parsed `{backend}_{key}_{value}` name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Variant {
    pub backend: Backend,
    pub key: KeyKind,
    pub value: ValueKind,
}

impl Variant {
    /// Parses a variant name such as `"robin_u64_val4"`.
    pub fn parse(name: &str) -> Result<Self> {
        let unknown = || TableError::UnknownVariant(name.to_owned());
        let mut parts = name.split('_');
        let (Some(backend), Some(key), Some(value), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(unknown());
        };
        Ok(Variant {
            backend: backend.parse().map_err(|_| unknown())?,
            key: KeyKind::ALL
                .into_iter()
                .find(|kind| kind.name() == key)
                .ok_or_else(unknown)?,
            value: ValueKind::ALL
                .into_iter()
                .find(|kind| kind.name() == value)
                .ok_or_else(unknown)?,
        })
    }

    pub fn name(&self) -> String {
        format!(
            "{}_{}_{}",
            self.backend.name(),
            self.key.name(),
            self.value.name()
        )
    }

    /// Every variant, backend-major.
    pub fn all() -> impl Iterator<Item = Variant> {
        Backend::ALL.into_iter().flat_map(|backend| {
            KeyKind::ALL.into_iter().flat_map(move |key| {
                ValueKind::ALL
                    .into_iter()
                    .map(move |value| Variant { backend, key, value })
            })
        })
    }
}

/// A table of any variant, driven through byte-encoded keys and values.
///
/// Integer keys travel as little-endian bytes of their exact width. Values travel as their
/// slot bytes, set-mode variants take and return empty values.
///
/// Borrowing variants keep the inserted key bytes for `'k`; owning variants copy them.
pub trait DynTable<'k> {
    fn variant(&self) -> Variant;

    /// Inserts or overwrites, returning whether the key is new.
    fn insert(&mut self, key: &'k [u8], value: &[u8]) -> Result<bool>;

    /// Value bytes stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>>;

    fn erase(&mut self, key: &[u8]) -> Result<bool>;

    fn size(&self) -> usize;

    /// Number of entries a full traversal visits.
    fn iter_count(&self) -> usize;

    /// Visits every live entry with its key and value bytes.
    fn for_each_entry(&self, f: &mut dyn FnMut(&[u8], &[u8]));

    fn memory_footprint(&self) -> usize;

    fn bucket_count(&self) -> usize;

    fn raw_hash(&self, key: &[u8]) -> Result<u64>;
}

/// Adapts a typed table to [`DynTable`].
struct Erased<K, V, T> {
    table: T,
    variant: Variant,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<'k, K, V, T> DynTable<'k> for Erased<K, V, T>
where
    K: ByteKey<'k>,
    V: SlotValue,
    T: Table<K, V>,
{
    fn variant(&self) -> Variant {
        self.variant
    }

    fn insert(&mut self, key: &'k [u8], value: &[u8]) -> Result<bool> {
        let key = K::from_key_bytes(key)?;
        let value = V::from_bytes(value)?;
        self.table.insert(key, value)
    }

    fn get(&self, key: &[u8]) -> Result<Option<&[u8]>> {
        K::with_lookup(key, |lookup| self.table.get(lookup).map(SlotValue::as_bytes))
    }

    fn erase(&mut self, key: &[u8]) -> Result<bool> {
        K::with_lookup(key, |lookup| self.table.erase(lookup))
    }

    fn size(&self) -> usize {
        self.table.size()
    }

    fn iter_count(&self) -> usize {
        self.table.iterate().count()
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&[u8], &[u8])) {
        for (key, value) in self.table.iterate() {
            key.with_key_bytes(|key| f(key, value.as_bytes()));
        }
    }

    fn memory_footprint(&self) -> usize {
        self.table.memory_footprint()
    }

    fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    fn raw_hash(&self, key: &[u8]) -> Result<u64> {
        K::with_lookup(key, |lookup| self.table.raw_hash(lookup))
    }
}

/// Boxed dynamic table.
pub type BoxedTable<'k> = Box<dyn DynTable<'k> + 'k>;

fn open_typed<'k, K, V>(variant: Variant, config: &TableConfig) -> Result<BoxedTable<'k>>
where
    K: ByteKey<'k> + 'k,
    V: SlotValue + 'k,
{
    let table = AnyTable::<K, V>::with_config(variant.backend, config)?;
    Ok(Box::new(Erased {
        table,
        variant,
        _marker: PhantomData,
    }))
}

fn open_keyed<'k, K>(variant: Variant, config: &TableConfig) -> Result<BoxedTable<'k>>
where
    K: ByteKey<'k> + 'k,
{
    match variant.value {
        ValueKind::Void => open_typed::<K, ()>(variant, config),
        ValueKind::Val4 => open_typed::<K, Val4>(variant, config),
        ValueKind::Val56 => open_typed::<K, Val56>(variant, config),
        ValueKind::Val64 => open_typed::<K, Val64>(variant, config),
        ValueKind::Val256 => open_typed::<K, Val256>(variant, config),
    }
}

/// Builds an empty table of the variant called `name`.
///
/// # Errors
///
/// [`TableError::UnknownVariant`] if `name` does not name a variant.
///
/// # Examples
///
/// ```rust
/// let key = 7u32.to_le_bytes();
/// let mut table = fairtable::variants::open("robin_u32_val4").unwrap();
/// assert!(table.insert(&key, b"abcd").unwrap());
/// assert_eq!(table.get(&key).unwrap(), Some(&b"abcd"[..]));
/// ```
pub fn open<'k>(name: &str) -> Result<BoxedTable<'k>> {
    open_with_config(name, &TableConfig::default())
}

/// Builds a table of the variant called `name`, pre-sized according to `config`.
pub fn open_with_config<'k>(name: &str, config: &TableConfig) -> Result<BoxedTable<'k>> {
    let variant = Variant::parse(name)?;
    match variant.key {
        KeyKind::U16 => open_keyed::<u16>(variant, config),
        KeyKind::U32 => open_keyed::<u32>(variant, config),
        KeyKind::U64 => open_keyed::<u64>(variant, config),
        KeyKind::Str => open_keyed::<Box<[u8]>>(variant, config),
        KeyKind::StrFair => open_keyed::<&'k [u8]>(variant, config),
    }
}

/// Names of every variant [`open`] accepts.
pub fn names() -> Vec<String> {
    Variant::all().map(|variant| variant.name()).collect()
}
