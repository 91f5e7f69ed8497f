use super::*;
use crate::paths::SymbolicPath;

/// A view of one indexed category sequence, anchored at a boundary category.
///
/// Local paths given to an encoding are relative to its prefix; slices it returns
/// start at the anchor.
#[derive(Debug, Clone)]
pub struct Encoding<'a> {
    index: &'a PathIndex,
    sequence: &'a [BindingCategory],
    prefix: Vec<PathKey>,
    start: usize,
}

impl<'a> Encoding<'a> {
    pub(super) fn new(
        index: &'a PathIndex,
        sequence: &'a [BindingCategory],
        prefix: Vec<PathKey>,
        start: usize,
    ) -> Result<Self, BindingError> {
        if !has_single_boundary(&sequence[start..]) {
            return Err(BindingError::BoundaryViolation(describe_keys(&prefix)));
        }

        Ok(Self {
            index,
            sequence,
            prefix,
            start,
        })
    }

    /// the anchor category
    pub fn category(&self) -> &'a BindingCategory {
        &self.sequence[self.start]
    }

    pub fn prefix(&self) -> &[PathKey] {
        &self.prefix
    }

    fn full_keys(&self, local: &SymbolicPath) -> Vec<PathKey> {
        let mut keys = self.prefix.clone();
        keys.extend(local.keys());
        keys
    }

    fn lookup(&self, keys: &[PathKey]) -> Option<&'a [BindingCategory]> {
        let index: &'a PathIndex = self.index;
        let sequence = index.lookup(keys)?;
        debug_assert!(sequence.starts_with(&self.sequence[..=self.start]));

        (sequence.len() > self.start).then_some(sequence)
    }

    /// Category sequence from the anchor to `local`, which may cross at most one
    /// further boundary.
    pub fn local_category_sequence(
        &self,
        local: &SymbolicPath,
    ) -> Result<&'a [BindingCategory], BindingError> {
        let keys = self.full_keys(local);
        let sequence = self
            .lookup(&keys)
            .ok_or_else(|| BindingError::UnknownPath(describe_keys(&keys)))?;

        if !has_single_boundary(&sequence[self.start + 1..]) {
            return Err(BindingError::BoundaryViolation(describe_keys(&keys)));
        }

        Ok(&sequence[self.start..])
    }

    /// Same as [`Encoding::local_category_sequence`] but empty for paths that do
    /// not resolve, used to try completions of a path.
    pub fn candidate_local_category_sequence(&self, local: &SymbolicPath) -> &'a [BindingCategory] {
        let keys = self.full_keys(local);
        match self.lookup(&keys) {
            Some(sequence) if has_single_boundary(&sequence[self.start + 1..]) => {
                &sequence[self.start..]
            }
            _ => &[],
        }
    }

    /// The encoding anchored at the first boundary past this anchor on the way to
    /// `local`: a nested table or an encodable buffer.
    pub fn child_encoding(&self, local: &SymbolicPath) -> Result<Encoding<'a>, BindingError> {
        let keys = self.full_keys(local);
        let sequence = self
            .lookup(&keys)
            .ok_or_else(|| BindingError::UnknownPath(describe_keys(&keys)))?;

        let position = sequence
            .iter()
            .enumerate()
            .skip(self.start + 1)
            .find(|(_, category)| category.is_boundary())
            .map(|(position, _)| position)
            .ok_or_else(|| BindingError::InvalidChildPath(describe_keys(&keys)))?;

        Encoding::new(self.index, sequence, keys, position)
    }

    /// categories from this anchor up to and including the anchor of `child`
    pub fn local_sequence_to(&self, child: &Encoding<'a>) -> &'a [BindingCategory] {
        debug_assert!(child.sequence.starts_with(&self.sequence[..=self.start]));
        &child.sequence[self.start..=child.start]
    }
}

fn has_single_boundary(categories: &[BindingCategory]) -> bool {
    categories.iter().filter(|c| c.is_boundary()).count() <= 1
}
