//! Slot and byte-offset arithmetic over a symbolic path and its category sequence.
//!
//! Each category consumes the same tokens it projects into the path index: a root
//! takes its name and, when it is an array, an index; a struct member takes its name;
//! arrays take an index. A path that does not line up with its sequence means the
//! index was built wrong, and panics.

use crate::classifier::BindingCategory;
use crate::error::BindingError;
use crate::paths::PathToken;

struct Tokens<'p> {
    path: &'p [PathToken],
    position: usize,
}

impl<'p> Tokens<'p> {
    fn new(path: &'p [PathToken]) -> Self {
        Self { path, position: 0 }
    }

    fn name(&mut self) {
        assert!(
            matches!(self.path.get(self.position), Some(PathToken::Named(_))),
            "expected a name at position {} of {:?}",
            self.position,
            self.path
        );
        self.position += 1;
    }

    fn index(&mut self, length: usize) -> Result<usize, BindingError> {
        let Some(index) = self.path.get(self.position).and_then(PathToken::index) else {
            panic!(
                "expected an index at position {} of {:?}",
                self.position, self.path
            );
        };
        if index >= length {
            return Err(BindingError::IndexOutOfBounds {
                position: self.position,
                index,
                length,
            });
        }

        self.position += 1;
        Ok(index)
    }

    fn finish(self) {
        assert_eq!(
            self.position,
            self.path.len(),
            "path {:?} not fully consumed",
            self.path
        );
    }
}

/// Slot index inside a binding table, accumulated over argument indices and
/// array index strides.
pub fn resolve_slot_index(
    path: &[PathToken],
    categories: &[BindingCategory],
) -> Result<usize, BindingError> {
    let mut tokens = Tokens::new(path);
    let mut slot = 0;

    for category in categories {
        match category {
            BindingCategory::StructMember(member) => {
                tokens.name();
                slot += member.argument_index;
            }
            BindingCategory::Array(array) => {
                let index = tokens.index(array.array_length)?;
                slot += array.argument_index_stride * index;
            }
            BindingCategory::InlineArray(member, array) => {
                let index = tokens.index(array.array_length)?;
                slot += array.argument_index_stride * index + member.argument_index;
            }
            category => {
                if let Some(argument) = category.argument() {
                    tokens.name();
                    slot += argument.index;
                    if argument.array_length > 1 {
                        slot += tokens.index(argument.array_length)?;
                    }
                }
            }
        }
    }

    tokens.finish();
    Ok(slot)
}

/// Byte offset from the start of the anchoring buffer, accumulated over member
/// offsets and array strides.
pub fn resolve_byte_offset(
    path: &[PathToken],
    categories: &[BindingCategory],
) -> Result<usize, BindingError> {
    let mut tokens = Tokens::new(path);
    let mut offset = 0;

    for category in categories {
        match category {
            BindingCategory::StructMember(member) => {
                tokens.name();
                offset += member.offset;
            }
            BindingCategory::Array(array) | BindingCategory::InlineArray(_, array) => {
                let index = tokens.index(array.array_length)?;
                offset += array.stride * index;
            }
            category => {
                if let Some(argument) = category.argument() {
                    tokens.name();
                    if argument.array_length > 1 {
                        tokens.index(argument.array_length)?;
                    }
                }
            }
        }
    }

    tokens.finish();
    Ok(offset)
}

/// tokens taken by a run of categories
fn tokens_taken(categories: &[BindingCategory]) -> usize {
    categories.iter().map(BindingCategory::token_count).sum()
}

/// Slot of a full path's destination as its own table encoder sees it: relative to
/// the innermost argument table on the way, or the root slot for top-level
/// destinations. `None` for plain data inside a buffer, which has no slot.
pub fn resolve_local_slot(
    path: &[PathToken],
    categories: &[BindingCategory],
) -> Result<Option<usize>, BindingError> {
    let Some((_, before)) = categories.split_last() else {
        return Ok(None);
    };

    match before.iter().rposition(BindingCategory::is_boundary) {
        None => resolve_slot_index(path, categories).map(Some),
        Some(anchor) if categories[anchor].is_table() => {
            let taken = tokens_taken(&categories[..=anchor]);
            resolve_slot_index(&path[taken..], &categories[anchor + 1..]).map(Some)
        }
        Some(_) => Ok(None),
    }
}

/// Byte offset of a full path's destination from the innermost buffer or table it
/// reaches, along with the position of that anchor in `categories`.
pub fn resolve_local_offset(
    path: &[PathToken],
    categories: &[BindingCategory],
) -> Result<(usize, usize), BindingError> {
    let anchor = categories
        .iter()
        .rposition(BindingCategory::is_boundary)
        .unwrap_or(0);
    let taken = tokens_taken(&categories[..=anchor]);
    let offset = resolve_byte_offset(&path[taken..], &categories[anchor + 1..])?;

    Ok((offset, anchor))
}
