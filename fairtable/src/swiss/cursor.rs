//! The cursor over a [`crate::swiss::SwissTable`].
use fairtable_core::Cursor;
use hashbrown::hash_table;
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;

/// Wraps hashbrown's iterator, holding the entry under the cursor.
#[derive(Clone)]
pub struct SwissCursor<'a, K, V> {
    iter: hash_table::Iter<'a, (K, V)>,
    current: Option<&'a (K, V)>,
}

impl<'a, K, V> SwissCursor<'a, K, V> {
    pub(crate) fn new(mut iter: hash_table::Iter<'a, (K, V)>) -> Self {
        let current = iter.next();
        Self { iter, current }
    }
}

impl<'a, K, V> Cursor<'a, K, V> for SwissCursor<'a, K, V> {
    #[inline]
    fn is_end(&self) -> bool {
        self.current.is_none()
    }

    #[inline]
    fn entry(&self) -> Option<(&'a K, &'a V)> {
        self.current.map(|(key, value)| (key, value))
    }

    #[inline]
    fn advance(&mut self) {
        if self.current.is_some() {
            self.current = self.iter.next();
        }
    }
}

impl<'a, K, V> Iterator for SwissCursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entry()?;
        self.advance();
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.iter.len() + usize::from(self.current.is_some());
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for SwissCursor<'_, K, V> {}

impl<K, V> FusedIterator for SwissCursor<'_, K, V> {}

impl<K, V> Debug for SwissCursor<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwissCursor")
            .field("remaining", &(self.iter.len() + usize::from(self.current.is_some())))
            .finish()
    }
}
