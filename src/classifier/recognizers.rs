use super::*;

/// Read-only view of a node path at one position. Recognizers never move it,
/// so trying the next rule needs no rollback.
pub(super) struct Cursor<'c, 'a> {
    nodes: &'c [TypeNode<'a>],
    position: usize,
    previous: Option<&'c BindingCategory>,
}

impl<'c, 'a> Cursor<'c, 'a> {
    pub(super) fn new(
        nodes: &'c [TypeNode<'a>],
        position: usize,
        previous: Option<&'c BindingCategory>,
    ) -> Self {
        Self {
            nodes,
            position,
            previous,
        }
    }

    fn current(&self) -> TypeNode<'a> {
        self.nodes[self.position]
    }

    fn next(&self) -> Option<TypeNode<'a>> {
        self.nodes.get(self.position + 1).copied()
    }

    fn after_next(&self) -> Option<TypeNode<'a>> {
        self.nodes.get(self.position + 2).copied()
    }

    /// the category emitted just before this position
    pub(super) fn previous(&self) -> Option<&'c BindingCategory> {
        self.previous
    }
}

/// a match yields the category and the number of nodes it consumes
pub(super) type Recognizer = fn(&Cursor<'_, '_>) -> Option<(BindingCategory, usize)>;

// specific shapes first, generic fallbacks last
pub(super) const RECOGNIZERS: [Recognizer; 12] = [
    inline_array,
    atomic_variable,
    argument_containing_table,
    encodable_argument,
    argument,
    texture_argument,
    sampler_argument,
    struct_member,
    encodable_buffer,
    buffer,
    array,
    indirection_table,
];

fn inline_array(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let TypeNode::Struct(_) = cursor.current() else {
        return None;
    };
    let Some(TypeNode::StructMember(member)) = cursor.next() else {
        return None;
    };
    if member.name != INLINE_ARRAY_MEMBER || !matches!(member.data_type, DataType::Array(_)) {
        return None;
    }
    let Some(TypeNode::Array(array)) = cursor.after_next() else {
        return None;
    };

    let category = BindingCategory::InlineArray(MemberInfo::new(member), ArrayInfo::new(array));
    Some((category, 3))
}

fn atomic_variable(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let TypeNode::Struct(_) = cursor.current() else {
        return None;
    };
    let Some(TypeNode::StructMember(member)) = cursor.next() else {
        return None;
    };
    if member.name != ATOMIC_MEMBER {
        return None;
    }

    Some((BindingCategory::AtomicVariable(MemberInfo::new(member)), 2))
}

/// a buffer root and its pointer
fn buffer_root<'a>(cursor: &Cursor<'_, 'a>) -> Option<(&'a Argument, &'a PointerType)> {
    let TypeNode::Argument(argument) = cursor.current() else {
        return None;
    };
    if argument.kind != ArgumentKind::Buffer {
        return None;
    }
    let Some(TypeNode::Pointer(pointer)) = cursor.next() else {
        return None;
    };

    Some((argument, pointer))
}

fn argument_containing_table(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let (argument, pointer) = buffer_root(cursor)?;
    if !pointer.element_is_argument_buffer {
        return None;
    }

    let category = BindingCategory::ArgumentContainingIndirectionTable(
        ArgumentInfo::new(argument),
        PointerInfo::new(pointer),
    );
    Some((category, 2))
}

fn encodable_argument(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let (argument, pointer) = buffer_root(cursor)?;
    if pointer.element_is_argument_buffer {
        return None;
    }
    let Some(TypeNode::Struct(_)) = cursor.after_next() else {
        return None;
    };

    let category =
        BindingCategory::EncodableArgument(ArgumentInfo::new(argument), PointerInfo::new(pointer));
    Some((category, 2))
}

fn argument(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    if let TypeNode::Argument(argument) = cursor.current() {
        if argument.kind == ArgumentKind::ThreadgroupMemory {
            return Some((BindingCategory::Argument(ArgumentInfo::new(argument)), 1));
        }
    }

    let (argument, pointer) = buffer_root(cursor)?;
    if pointer.element_is_argument_buffer || matches!(*pointer.element, DataType::Struct(_)) {
        return None;
    }

    Some((BindingCategory::Argument(ArgumentInfo::new(argument)), 2))
}

fn texture_argument(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    match cursor.current() {
        TypeNode::Argument(argument) if argument.kind == ArgumentKind::Texture => Some((
            BindingCategory::TextureArgument(ArgumentInfo::new(argument)),
            1,
        )),
        _ => None,
    }
}

fn sampler_argument(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    match cursor.current() {
        TypeNode::Argument(argument) if argument.kind == ArgumentKind::Sampler => Some((
            BindingCategory::SamplerArgument(ArgumentInfo::new(argument)),
            1,
        )),
        _ => None,
    }
}

fn struct_member(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let TypeNode::Struct(_) = cursor.current() else {
        return None;
    };
    let Some(TypeNode::StructMember(member)) = cursor.next() else {
        return None;
    };

    Some((BindingCategory::StructMember(MemberInfo::new(member)), 2))
}

fn encodable_buffer(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let TypeNode::Pointer(pointer) = cursor.current() else {
        return None;
    };
    if pointer.element_is_argument_buffer {
        return None;
    }
    let Some(TypeNode::Struct(_)) = cursor.next() else {
        return None;
    };

    Some((BindingCategory::EncodableBuffer(PointerInfo::new(pointer)), 1))
}

fn buffer(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    match cursor.current() {
        TypeNode::Pointer(pointer) if !pointer.element_is_argument_buffer => {
            Some((BindingCategory::Buffer(PointerInfo::new(pointer)), 1))
        }
        _ => None,
    }
}

fn array(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    let TypeNode::Array(array) = cursor.current() else {
        return None;
    };

    Some((BindingCategory::Array(ArrayInfo::new(array)), 1))
}

fn indirection_table(cursor: &Cursor<'_, '_>) -> Option<(BindingCategory, usize)> {
    match cursor.current() {
        TypeNode::Pointer(pointer) if pointer.element_is_argument_buffer => {
            Some((BindingCategory::IndirectionTable(PointerInfo::new(pointer)), 1))
        }
        _ => None,
    }
}
