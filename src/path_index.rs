use std::collections::HashMap;

use log::*;

use crate::classifier::{BindingCategory, classify};
use crate::error::BindingError;
use crate::paths::{PathKey, SymbolicPath, describe_keys};
use crate::reflection::{Argument, describe_node_path, leaf_paths};

mod encoding;
pub use encoding::*;

/// Maps every classified symbolic-path prefix of a function's arguments to the
/// category sequence reached at that prefix.
///
/// Built once per function; immutable afterwards.
#[derive(Debug, Default)]
pub struct PathIndex {
    mapping: HashMap<Vec<PathKey>, Vec<BindingCategory>>,
}

impl PathIndex {
    pub fn new(arguments: &[Argument]) -> Result<Self, BindingError> {
        let mut index = Self::default();

        for argument in arguments {
            for nodes in leaf_paths(argument)? {
                let categories = classify(&nodes)?;
                trace!(
                    "{} => {}",
                    describe_node_path(&nodes),
                    describe_categories(&categories)
                );
                index.insert_leaf(categories);
            }
        }

        debug!(
            "indexed {} paths over {} arguments",
            index.mapping.len(),
            arguments.len()
        );

        Ok(index)
    }

    fn insert_leaf(&mut self, categories: Vec<BindingCategory>) {
        let mut keys: Vec<PathKey> = vec![];
        let mut sequence: Vec<BindingCategory> = vec![];

        for category in categories {
            let projected = projected_keys(&category);
            let silent = matches!(category, BindingCategory::AtomicVariable(_));
            sequence.push(category);

            // buffers and tables take over the entry of the path naming them
            if projected.is_empty() {
                if !silent && !keys.is_empty() {
                    self.mapping.insert(keys.clone(), sequence.clone());
                }
                continue;
            }

            for key in projected {
                keys.push(key);
                self.mapping.insert(keys.clone(), sequence.clone());
            }
        }
    }

    pub fn lookup(&self, keys: &[PathKey]) -> Option<&[BindingCategory]> {
        self.mapping.get(keys).map(Vec::as_slice)
    }

    /// Looks up a full path for address resolution. The path must carry every index
    /// its categories take, so `tex` alone is rejected for an array root.
    pub fn resolve(&self, path: &SymbolicPath) -> Result<&[BindingCategory], BindingError> {
        let sequence = self
            .lookup(&path.keys())
            .ok_or_else(|| BindingError::UnknownPath(path.to_string()))?;

        let projected: usize = sequence.iter().map(BindingCategory::token_count).sum();
        if projected != path.tokens().len() {
            return Err(BindingError::RequiresArrayReference(path.to_string()));
        }

        Ok(sequence)
    }

    /// the encoding view anchored at a root argument
    pub fn encoding(&self, root: &str) -> Result<Encoding<'_>, BindingError> {
        let prefix = vec![PathKey::Named(root.to_string())];
        let sequence = self
            .lookup(&prefix)
            .ok_or_else(|| BindingError::UnknownArgument(root.to_string()))?;

        Encoding::new(self, sequence, prefix, 0)
    }

    /// all indexed paths in display form, sorted
    pub fn paths(&self) -> Vec<(String, &[BindingCategory])> {
        let mut keys: Vec<_> = self.mapping.keys().collect();
        keys.sort();

        keys.into_iter()
            .map(|k| (describe_keys(k), self.mapping[k].as_slice()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// the symbolic path keys a category accounts for
pub fn projected_keys(category: &BindingCategory) -> Vec<PathKey> {
    let keys = match category {
        BindingCategory::StructMember(member) => vec![PathKey::Named(member.name.clone())],
        BindingCategory::Array(_) | BindingCategory::InlineArray(..) => vec![PathKey::Indexed],
        category => match category.argument() {
            Some(argument) if argument.array_length > 1 => {
                vec![PathKey::Named(argument.name.clone()), PathKey::Indexed]
            }
            Some(argument) => vec![PathKey::Named(argument.name.clone())],
            None => vec![],
        },
    };
    debug_assert_eq!(keys.len(), category.token_count());

    keys
}

pub fn describe_categories(categories: &[BindingCategory]) -> String {
    categories
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" > ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{resolve_byte_offset, resolve_slot_index};
    use crate::paths::PathToken;
    use crate::test_support::*;

    fn keys(path: &str) -> Vec<PathKey> {
        path.parse::<SymbolicPath>().unwrap().keys()
    }

    fn index() -> PathIndex {
        PathIndex::new(&[
            scenario_buffer(),
            scene_table(),
            texture_argument("tex", 2, 4),
        ])
        .unwrap()
    }

    #[test]
    fn every_prefix_is_indexed() {
        let index = index();

        for path in [
            "buf",
            "buf.i",
            "buf.arr",
            "buf.arr[0]",
            "scene",
            "scene.samplers[1]",
            "scene.lights.range",
            "scene.material.normal_map",
            "scene.weights[3]",
            "tex",
            "tex[0]",
        ] {
            assert!(index.lookup(&keys(path)).is_some(), "{path}");
        }
    }

    #[test]
    fn projected_keys_reproduce_the_lookup_key() {
        let index = index();

        for (_, sequence) in index.paths() {
            let projected: Vec<_> = sequence.iter().flat_map(projected_keys).collect();
            assert!(index.lookup(&projected).is_some());
        }
        for path in ["buf.arr[0]", "scene.material.roughness", "scene.weights[1]", "tex[2]"] {
            let sequence = index.lookup(&keys(path)).unwrap();
            let projected: Vec<_> = sequence.iter().flat_map(projected_keys).collect();
            assert_eq!(projected, keys(path), "{path}");
        }
    }

    #[test]
    fn every_indexed_key_resolves_or_needs_an_index() {
        let index = index();

        for keys in index.mapping.keys() {
            let tokens = keys
                .iter()
                .map(|key| match key {
                    PathKey::Named(name) => PathToken::Named(name.clone()),
                    PathKey::Indexed => PathToken::Indexed(0),
                })
                .collect();
            let path = SymbolicPath::new(tokens).unwrap();

            match index.resolve(&path) {
                Ok(sequence) => {
                    let projected: Vec<_> = sequence.iter().flat_map(projected_keys).collect();
                    assert_eq!(&projected, keys, "{path}");
                    assert!(resolve_slot_index(path.tokens(), sequence).is_ok(), "{path}");
                    assert!(resolve_byte_offset(path.tokens(), sequence).is_ok(), "{path}");
                }
                Err(err) => {
                    assert_eq!(err, BindingError::RequiresArrayReference(path.to_string()));
                }
            }
        }
    }

    #[test]
    fn array_root_without_index_needs_an_explicit_element() {
        let index = index();

        assert_eq!(
            index.resolve(&"tex".parse().unwrap()),
            Err(BindingError::RequiresArrayReference("tex".to_string()))
        );
        assert_eq!(index.resolve(&"tex[3]".parse().unwrap()).map(<[_]>::len), Ok(1));
        assert_eq!(
            index.resolve(&"buf.j".parse().unwrap()),
            Err(BindingError::UnknownPath("buf.j".to_string()))
        );
    }

    #[test]
    fn pointer_members_resolve_to_their_buffer() {
        let index = index();

        let lights = index.lookup(&keys("scene.lights")).unwrap();
        assert!(matches!(lights.last(), Some(BindingCategory::EncodableBuffer(_))));

        let material = index.lookup(&keys("scene.material")).unwrap();
        assert!(matches!(material.last(), Some(BindingCategory::IndirectionTable(_))));
    }

    #[test]
    fn atomic_member_is_transparent() {
        let plain = PathIndex::new(&[buffer_argument(
            "counters",
            0,
            pointer(struct_type(vec![member("counter", 0, int())])),
        )])
        .unwrap();
        let wrapped = PathIndex::new(&[buffer_argument(
            "counters",
            0,
            pointer(struct_type(vec![member("counter", 0, atomic(int()))])),
        )])
        .unwrap();

        let plain = plain.lookup(&keys("counters.counter")).unwrap();
        let wrapped = wrapped.lookup(&keys("counters.counter")).unwrap();

        assert_eq!(plain.len(), wrapped.len());
    }

    #[test]
    fn inline_array_wrapper_adds_no_path_segment() {
        let index = index();

        assert!(index.lookup(&keys("scene.weights[2]")).is_some());
        assert!(index.lookup(&keys("scene.weights.__elems")).is_none());
    }

    #[test]
    fn unknown_paths_are_absent() {
        let index = index();

        assert!(index.lookup(&keys("buf.j")).is_none());
        assert!(index.lookup(&keys("nope")).is_none());
        assert_eq!(
            index.encoding("nope").unwrap_err(),
            BindingError::UnknownArgument("nope".to_string())
        );
    }

    #[test]
    fn configuration_errors_abort_construction() {
        let result = PathIndex::new(&[
            scenario_buffer(),
            buffer_argument("empty", 1, pointer(struct_type(vec![]))),
        ]);

        assert!(matches!(result, Err(BindingError::Unclassified { .. })));
    }
}
