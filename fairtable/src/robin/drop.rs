//! Implements [`Drop`] for [`RobinTable`].
use crate::robin::{Meta, RobinTable};

impl<K, V, E> Drop for RobinTable<K, V, E> {
    fn drop(&mut self) {
        if !std::mem::needs_drop::<(K, V)>() {
            return;
        }
        for (meta, bucket) in self.meta.iter().zip(self.buckets.iter_mut()) {
            if *meta != Meta::EMPTY {
                unsafe { bucket.assume_init_drop() };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::robin::RobinTable;
    use fairtable_core::{NewTable, Table};
    use std::rc::Rc;

    #[test]
    fn test_drops_live_entries_once() {
        let witness = Rc::new(());
        {
            let mut table = RobinTable::<Box<[u8]>, Rc<()>>::create();
            for key in 0..200u32 {
                let key: Box<[u8]> = key.to_le_bytes().into();
                table.insert(key, Rc::clone(&witness)).unwrap();
            }
            for key in 0..100u32 {
                assert!(table.erase(&key.to_le_bytes()[..]));
            }
            assert_eq!(Rc::strong_count(&witness), 101);
        }
        assert_eq!(Rc::strong_count(&witness), 1);
    }
}
