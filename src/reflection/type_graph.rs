use super::*;
use crate::error::BindingError;

/// A node of a reflected argument's type tree.
///
/// Nodes borrow from the reflection data; the tree is walked through [`TypeNode::children`]
/// rather than stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeNode<'a> {
    Argument(&'a Argument),
    Pointer(&'a PointerType),
    Struct(&'a StructType),
    StructMember(&'a StructMember),
    Array(&'a ArrayType),
}

impl<'a> TypeNode<'a> {
    /// immediate children, empty for leaves
    pub fn children(self) -> Result<Vec<TypeNode<'a>>, BindingError> {
        let children = match self {
            TypeNode::Argument(argument) => match argument.kind {
                ArgumentKind::Buffer => {
                    let pointer = argument
                        .buffer_pointer_type
                        .as_ref()
                        .ok_or_else(|| BindingError::MissingPointerType(argument.name.clone()))?;
                    vec![TypeNode::Pointer(pointer)]
                }
                ArgumentKind::Texture | ArgumentKind::Sampler | ArgumentKind::ThreadgroupMemory => {
                    vec![]
                }
                kind => {
                    return Err(BindingError::UnsupportedArgument {
                        argument: argument.name.clone(),
                        kind,
                    });
                }
            },
            TypeNode::Pointer(pointer) => match pointer.element.as_ref() {
                DataType::Struct(s) => vec![TypeNode::Struct(s)],
                DataType::Array(a) => vec![TypeNode::Array(a)],
                _ => vec![],
            },
            TypeNode::Struct(s) => s.members.iter().map(TypeNode::StructMember).collect(),
            TypeNode::StructMember(member) => composite(&member.data_type).into_iter().collect(),
            TypeNode::Array(array) => composite(&array.element).into_iter().collect(),
        };

        Ok(children)
    }

    pub fn label(self) -> &'a str {
        match self {
            TypeNode::Argument(argument) => argument.name.as_str(),
            TypeNode::StructMember(member) => member.name.as_str(),
            TypeNode::Pointer(_) => "*",
            TypeNode::Struct(_) => "{}",
            TypeNode::Array(_) => "[]",
        }
    }
}

fn composite(data_type: &DataType) -> Option<TypeNode<'_>> {
    match data_type {
        DataType::Struct(s) => Some(TypeNode::Struct(s)),
        DataType::Array(a) => Some(TypeNode::Array(a)),
        DataType::Pointer(p) => Some(TypeNode::Pointer(p)),
        _ => None,
    }
}

/// Depth-first expansion of an argument to every root-to-leaf node path,
/// in declaration order.
pub fn leaf_paths(argument: &Argument) -> Result<Vec<Vec<TypeNode<'_>>>, BindingError> {
    let mut leaves = vec![];
    let mut path = vec![TypeNode::Argument(argument)];
    collect_leaves(&mut path, &mut leaves)?;

    Ok(leaves)
}

fn collect_leaves<'a>(
    path: &mut Vec<TypeNode<'a>>,
    leaves: &mut Vec<Vec<TypeNode<'a>>>,
) -> Result<(), BindingError> {
    let Some(&node) = path.last() else {
        return Ok(());
    };

    let children = node.children()?;
    if children.is_empty() {
        leaves.push(path.clone());
        return Ok(());
    }

    for child in children {
        path.push(child);
        collect_leaves(path, leaves)?;
        path.pop();
    }

    Ok(())
}

/// display form of a node path, used in configuration errors
pub fn describe_node_path(nodes: &[TypeNode<'_>]) -> String {
    nodes
        .iter()
        .map(|node| node.label())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> DataType {
        DataType::Value(ValueType {
            scalar_type: ScalarType::Int32,
            element_count: 1,
        })
    }

    fn member(name: &str, offset: usize, data_type: DataType) -> StructMember {
        StructMember {
            name: name.to_string(),
            offset,
            argument_index: 0,
            data_type,
        }
    }

    fn buffer_argument(name: &str, element: DataType) -> Argument {
        Argument {
            name: name.to_string(),
            kind: ArgumentKind::Buffer,
            index: 0,
            array_length: 1,
            access: Access::ReadOnly,
            buffer_data_size: 0,
            buffer_pointer_type: Some(PointerType {
                access: Access::ReadOnly,
                alignment: 4,
                data_size: 0,
                element_is_argument_buffer: false,
                element: Box::new(element),
            }),
        }
    }

    #[test]
    fn expands_struct_members_in_order() {
        let argument = buffer_argument(
            "buf",
            DataType::Struct(StructType {
                members: vec![
                    member("i", 0, int()),
                    member(
                        "arr",
                        4,
                        DataType::Array(ArrayType {
                            array_length: 10,
                            stride: 4,
                            argument_index_stride: 0,
                            element: Box::new(int()),
                        }),
                    ),
                ],
            }),
        );

        let leaves = leaf_paths(&argument).unwrap();

        let described: Vec<_> = leaves.iter().map(|l| describe_node_path(l)).collect();
        assert_eq!(described, ["buf/*/{}/i", "buf/*/{}/arr/[]"]);
    }

    #[test]
    fn pointer_to_scalar_is_a_leaf() {
        let argument = buffer_argument("count", int());

        let leaves = leaf_paths(&argument).unwrap();

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].len(), 2);
    }

    #[test]
    fn array_of_structs_expands_to_the_element() {
        let element = DataType::Struct(StructType {
            members: vec![member("x", 0, int())],
        });
        let array = ArrayType {
            array_length: 2,
            stride: 4,
            argument_index_stride: 1,
            element: Box::new(element),
        };

        let children = TypeNode::Array(&array).children().unwrap();

        assert!(matches!(children.as_slice(), [TypeNode::Struct(_)]));
    }

    #[test]
    fn rejects_unsupported_argument_kinds() {
        let argument = Argument {
            name: "functions".to_string(),
            kind: ArgumentKind::VisibleFunctionTable,
            index: 0,
            array_length: 1,
            access: Access::ReadOnly,
            buffer_data_size: 0,
            buffer_pointer_type: None,
        };

        let err = leaf_paths(&argument).unwrap_err();

        assert!(matches!(err, BindingError::UnsupportedArgument { .. }));
    }

    #[test]
    fn buffer_without_pointer_type_is_a_configuration_error() {
        let mut argument = buffer_argument("buf", int());
        argument.buffer_pointer_type = None;

        assert_eq!(
            TypeNode::Argument(&argument).children(),
            Err(BindingError::MissingPointerType("buf".to_string()))
        );
    }
}
