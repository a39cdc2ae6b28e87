//! Offset-based text surgery.
//!
//! Transformers never mutate text while walking a tree. They collect [`Edit`]s
//! into an [`EditSet`], drop overlapping candidates (the edit covering the
//! larger original range wins), and apply the survivors from the highest
//! offset downward so earlier offsets stay valid.

use thiserror::Error;

/// Replace `source[start..end]` with `replacement`. `start == end` inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two edits touch the same original text.
    ///
    /// An insertion conflicts only with a replacement that strictly contains
    /// its position.
    pub fn overlaps(&self, other: &Edit) -> bool {
        if self.is_empty() {
            return other.start < self.start && self.start < other.end;
        }
        if other.is_empty() {
            return self.start < other.start && other.start < self.end;
        }
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Shift both offsets by `-base`. Used to move edits into a sub-slice.
    pub fn rebased(&self, base: usize) -> Self {
        Self::replace(self.start - base, self.end - base, self.replacement.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("edits {first:?} and {second:?} overlap")]
    Overlap {
        first: (usize, usize),
        second: (usize, usize),
    },
}

/// Candidate edits, each carrying a payload (typically the match it produces).
#[derive(Debug, Clone)]
pub struct EditSet<T> {
    entries: Vec<(Edit, T)>,
}

impl<T> Default for EditSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> EditSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit, payload: T) {
        self.entries.push((edit, payload));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn edits(&self) -> impl Iterator<Item = &Edit> {
        self.entries.iter().map(|(edit, _)| edit)
    }

    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, payload)| payload)
    }

    /// Keep a non-overlapping subset, preferring edits over larger ranges.
    ///
    /// Ties go to the earlier start, then to the edit pushed first. The
    /// surviving entries are left sorted by start offset.
    pub fn retain_longest(&mut self) {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| {
            let (ea, eb) = (&self.entries[a].0, &self.entries[b].0);
            eb.len()
                .cmp(&ea.len())
                .then(ea.start.cmp(&eb.start))
                .then(a.cmp(&b))
        });

        let mut keep = vec![false; self.entries.len()];
        let mut accepted: Vec<usize> = Vec::new();
        for index in order {
            let edit = &self.entries[index].0;
            if accepted
                .iter()
                .all(|&other| !edit.overlaps(&self.entries[other].0))
            {
                accepted.push(index);
                keep[index] = true;
            }
        }

        let mut kept: Vec<(usize, (Edit, T))> = std::mem::take(&mut self.entries)
            .into_iter()
            .enumerate()
            .filter(|(index, _)| keep[*index])
            .collect();
        kept.sort_by(|(ia, (a, _)), (ib, (b, _))| {
            a.start.cmp(&b.start).then(a.end.cmp(&b.end)).then(ia.cmp(ib))
        });
        self.entries = kept.into_iter().map(|(_, entry)| entry).collect();
    }

    /// Remove and return every entry lying within `start..end`.
    pub fn take_within(&mut self, start: usize, end: usize) -> Vec<(Edit, T)> {
        let (inside, outside): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(edit, _)| edit.start >= start && edit.end <= end);
        self.entries = outside;
        inside
    }

    /// Apply all edits to `source`. Fails on overlap or bad offsets.
    pub fn apply(&self, source: &str) -> Result<String, EditError> {
        let edits: Vec<&Edit> = self.edits().collect();
        apply_edits(source, &edits)
    }

    pub fn into_entries(self) -> Vec<(Edit, T)> {
        self.entries
    }

    pub fn into_payloads(self) -> Vec<T> {
        self.entries.into_iter().map(|(_, payload)| payload).collect()
    }
}

/// Apply non-overlapping edits from the highest offset downward.
///
/// Insertions at the same offset keep their relative order; an insertion at
/// the start of a replaced range lands before the replacement.
pub fn apply_edits(source: &str, edits: &[&Edit]) -> Result<String, EditError> {
    for edit in edits {
        if edit.start > edit.end || edit.end > source.len() {
            return Err(EditError::OutOfBounds {
                start: edit.start,
                end: edit.end,
                len: source.len(),
            });
        }
        for offset in [edit.start, edit.end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }
    }

    let mut order: Vec<usize> = (0..edits.len()).collect();
    order.sort_by(|&a, &b| {
        edits[b]
            .start
            .cmp(&edits[a].start)
            .then(edits[b].end.cmp(&edits[a].end))
            .then(b.cmp(&a))
    });

    for pair in order.windows(2) {
        let (later, earlier) = (edits[pair[0]], edits[pair[1]]);
        if later.overlaps(earlier) || (!later.is_empty() && earlier.end > later.start) {
            return Err(EditError::Overlap {
                first: (earlier.start, earlier.end),
                second: (later.start, later.end),
            });
        }
    }

    let mut output = source.to_string();
    for index in order {
        let edit = edits[index];
        output.replace_range(edit.start..edit.end, &edit.replacement);
    }
    Ok(output)
}
