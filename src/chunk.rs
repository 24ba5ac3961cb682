//! Splits an unbounded sequence into bounded batches.
//!
//! Used by the parse stage to group readings for hand-off and by the account
//! cache to respect the storage collaborator's per-call id ceiling.

/// Adapts `iter` into an iterator of `Vec`s holding exactly `size` elements,
/// except for a possibly smaller final chunk.
///
/// # Panics
///
/// Panics if `size` is zero.
pub(crate) fn chunks<I>(iter: I, size: usize) -> Chunks<I>
where
    I: Iterator,
{
    assert!(size > 0, "chunk size must be positive");
    Chunks { iter, size }
}

pub(crate) struct Chunks<I> {
    iter: I,
    size: usize,
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.iter.next()?;
        let mut chunk = Vec::with_capacity(self.size);
        chunk.push(first);
        while chunk.len() < self.size {
            match self.iter.next() {
                Some(item) => chunk.push(item),
                None => break,
            }
        }
        Some(chunk)
    }
}
