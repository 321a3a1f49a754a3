//! Offset mapping from normalized search text back to extracted page text.

/// Sorted table of `(normalized_offset, shift)` entries.
///
/// The original offset of a normalized position `p` is `p + shift`, where
/// `shift` comes from the entry with the greatest `normalized_offset <= p`.
/// Only changes of shift are stored, so text that needed no normalization
/// has the single entry `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTable {
    entries: Vec<(usize, isize)>,
}

impl Default for DiffTable {
    fn default() -> Self {
        Self::identity()
    }
}

impl DiffTable {
    /// Table mapping every offset to itself.
    pub fn identity() -> Self {
        Self {
            entries: vec![(0, 0)],
        }
    }

    /// Build a table from one original offset per normalized character.
    pub(crate) fn from_origins(origins: impl IntoIterator<Item = usize>) -> Self {
        let mut entries: Vec<(usize, isize)> = Vec::new();
        for (offset, origin) in origins.into_iter().enumerate() {
            let shift = origin as isize - offset as isize;
            if entries.last().map_or(true, |&(_, last)| last != shift) {
                entries.push((offset, shift));
            }
        }
        if entries.is_empty() {
            return Self::identity();
        }
        Self { entries }
    }

    /// The raw `(normalized_offset, shift)` entries.
    pub fn entries(&self) -> &[(usize, isize)] {
        &self.entries
    }

    /// Whether the table maps every offset to itself.
    pub fn is_identity(&self) -> bool {
        self.entries == [(0, 0)]
    }

    /// Index of the entry governing `offset`, searching from `from`.
    fn entry_index(&self, offset: usize, from: usize) -> usize {
        let tail = &self.entries[from..];
        let idx = tail.partition_point(|&(start, _)| start <= offset);
        from + idx.saturating_sub(1)
    }

    fn apply(&self, offset: usize, idx: usize) -> usize {
        let (_, shift) = self.entries[idx];
        (offset as isize + shift).max(0) as usize
    }

    /// Map a single normalized offset to original space.
    pub fn original_offset(&self, offset: usize) -> usize {
        let idx = self.entry_index(offset, 0);
        self.apply(offset, idx)
    }

    /// Map a normalized `(offset, len)` span to `(original_offset, original_len)`.
    ///
    /// The start and the last character are looked up independently, so a
    /// span whose end falls inside an expansion (e.g. the `1/` of a `¼`)
    /// still covers the whole original character. Empty spans map to an
    /// empty original span.
    pub fn original_span(&self, offset: usize, len: usize) -> (usize, usize) {
        let start_idx = self.entry_index(offset, 0);
        let start = self.apply(offset, start_idx);
        if len == 0 {
            return (start, 0);
        }
        let last = offset + len - 1;
        let end_idx = self.entry_index(last, start_idx);
        let end = self.apply(last, end_idx);
        let original_len = (end + 1).saturating_sub(start);
        (start, original_len)
    }
}
