//! Implements [`Drop`] for [`TombTable`].
use crate::tomb::TombTable;

/// Deinitializes only the full buckets and skips the empty and deleted ones.
impl<K, V, E> Drop for TombTable<K, V, E> {
    fn drop(&mut self) {
        if !std::mem::needs_drop::<(K, V)>() {
            return;
        }
        for (ctrl, bucket) in self.ctrl.iter().zip(self.buckets.iter_mut()) {
            if ctrl.is_full() {
                unsafe { bucket.assume_init_drop() };
            }
        }
    }
}
