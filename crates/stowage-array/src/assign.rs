//! Copy construction and copy assignment.

use stowage_core::StorageError;

use crate::array::DynArray;
use crate::guard::TailGuard;

impl<T: Clone> DynArray<T> {
    /// Clone into a new array with capacity exactly `self.len()`.
    ///
    /// If a clone panics, the clones made so far are dropped and the new
    /// storage released before the panic continues; `self` is never touched.
    pub fn try_clone(&self) -> Result<Self, StorageError> {
        let mut copy = Self::with_capacity(self.len)?;
        let mut tail = TailGuard::new(&mut copy.buf, 0);
        for item in self.iter() {
            tail.push(item.clone());
        }
        copy.len = tail.commit();
        Ok(copy)
    }

    /// Make `self` equal to `source`.
    ///
    /// When `source` does not fit in the current capacity, a full copy is
    /// built first and swapped in, so a failure leaves `self` as it was.
    ///
    /// When it fits, the storage is reused: the shared prefix is assigned
    /// element by element with [`Clone::clone_from`], extra elements are
    /// cloned onto the tail and surplus ones dropped. This path is only
    /// basic: after a panic the assigned slots hold their new values, the
    /// rest keep their old ones, and the array stays valid.
    pub fn assign_from(&mut self, source: &Self) -> Result<(), StorageError> {
        if source.len > self.capacity() {
            let mut copy = source.try_clone()?;
            self.swap(&mut copy);
            return Ok(());
        }
        let shared = self.len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..shared].iter_mut().zip(&source[..shared]) {
            dst.clone_from(src);
        }
        if source.len > self.len {
            let start = self.len;
            let mut tail = TailGuard::new(&mut self.buf, start);
            for item in &source[start..] {
                tail.push(item.clone());
            }
            self.len = tail.commit();
        } else {
            self.truncate(source.len);
        }
        Ok(())
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.raise())
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_from(source) {
            err.raise();
        }
    }
}
