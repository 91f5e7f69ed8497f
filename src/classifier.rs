use std::fmt;

use crate::error::BindingError;
use crate::reflection::*;

mod recognizers;
use recognizers::*;

/// reflection-assigned member name wrapping a fixed `array<T, N>`
pub const INLINE_ARRAY_MEMBER: &str = "__elems";
/// reflection-assigned member name wrapping an atomic scalar
pub const ATOMIC_MEMBER: &str = "__s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentInfo {
    pub name: String,
    pub kind: ArgumentKind,
    pub index: usize,
    pub array_length: usize,
    pub access: Access,
    pub buffer_data_size: usize,
}

impl ArgumentInfo {
    fn new(argument: &Argument) -> Self {
        Self {
            name: argument.name.clone(),
            kind: argument.kind,
            index: argument.index,
            array_length: argument.array_length,
            access: argument.access,
            buffer_data_size: argument.buffer_data_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerInfo {
    pub access: Access,
    pub alignment: usize,
    pub data_size: usize,
    pub element_is_argument_buffer: bool,
}

impl PointerInfo {
    fn new(pointer: &PointerType) -> Self {
        Self {
            access: pointer.access,
            alignment: pointer.alignment,
            data_size: pointer.data_size,
            element_is_argument_buffer: pointer.element_is_argument_buffer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub offset: usize,
    pub argument_index: usize,
    pub data_type: ElementKind,
}

impl MemberInfo {
    fn new(member: &StructMember) -> Self {
        Self {
            name: member.name.clone(),
            offset: member.offset,
            argument_index: member.argument_index,
            data_type: ElementKind::from(&member.data_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    pub array_length: usize,
    pub stride: usize,
    pub argument_index_stride: usize,
    pub element: ElementKind,
}

impl ArrayInfo {
    fn new(array: &ArrayType) -> Self {
        Self {
            array_length: array.array_length,
            stride: array.stride,
            argument_index_stride: array.argument_index_stride,
            element: ElementKind::from(array.element.as_ref()),
        }
    }
}

/// [`DataType`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Value,
    Struct,
    Array,
    Pointer,
    Texture,
    Sampler,
    RenderPipeline,
    IndirectCommandBuffer,
}

impl From<&DataType> for ElementKind {
    fn from(data_type: &DataType) -> Self {
        match data_type {
            DataType::Value(_) => Self::Value,
            DataType::Struct(_) => Self::Struct,
            DataType::Array(_) => Self::Array,
            DataType::Pointer(_) => Self::Pointer,
            DataType::Texture(_) => Self::Texture,
            DataType::Sampler => Self::Sampler,
            DataType::RenderPipeline => Self::RenderPipeline,
            DataType::IndirectCommandBuffer => Self::IndirectCommandBuffer,
        }
    }
}

/// How a run of type-tree nodes is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingCategory {
    /// a root bound as a whole value, also threadgroup memory
    Argument(ArgumentInfo),
    ArgumentContainingIndirectionTable(ArgumentInfo, PointerInfo),
    TextureArgument(ArgumentInfo),
    SamplerArgument(ArgumentInfo),
    /// a root pointing at a plain struct, written by copy or through a buffer
    EncodableArgument(ArgumentInfo, PointerInfo),
    IndirectionTable(PointerInfo),
    StructMember(MemberInfo),
    Array(ArrayInfo),
    Buffer(PointerInfo),
    EncodableBuffer(PointerInfo),
    /// the `__elems` member of a wrapped array, silent in paths
    InlineArray(MemberInfo, ArrayInfo),
    /// the `__s` member of an atomic, silent in paths
    AtomicVariable(MemberInfo),
}

impl BindingCategory {
    pub fn argument(&self) -> Option<&ArgumentInfo> {
        match self {
            BindingCategory::Argument(a)
            | BindingCategory::ArgumentContainingIndirectionTable(a, _)
            | BindingCategory::TextureArgument(a)
            | BindingCategory::SamplerArgument(a)
            | BindingCategory::EncodableArgument(a, _) => Some(a),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<&PointerInfo> {
        match self {
            BindingCategory::ArgumentContainingIndirectionTable(_, p)
            | BindingCategory::EncodableArgument(_, p)
            | BindingCategory::IndirectionTable(p)
            | BindingCategory::Buffer(p)
            | BindingCategory::EncodableBuffer(p) => Some(p),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&ArrayInfo> {
        match self {
            BindingCategory::Array(a) | BindingCategory::InlineArray(_, a) => Some(a),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.argument().is_some()
    }

    /// Categories that start a new local origin for addressing. At most one may
    /// follow the anchor of an encoding view.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            BindingCategory::Argument(_)
                | BindingCategory::ArgumentContainingIndirectionTable(..)
                | BindingCategory::EncodableArgument(..)
                | BindingCategory::IndirectionTable(_)
                | BindingCategory::EncodableBuffer(_)
        )
    }

    pub fn is_table(&self) -> bool {
        matches!(
            self,
            BindingCategory::ArgumentContainingIndirectionTable(..)
                | BindingCategory::IndirectionTable(_)
        )
    }

    pub fn is_array(&self) -> bool {
        self.array().is_some()
    }

    /// slots that take a buffer binding
    pub fn is_buffer(&self) -> bool {
        matches!(
            self,
            BindingCategory::Buffer(_)
                | BindingCategory::EncodableBuffer(_)
                | BindingCategory::IndirectionTable(_)
        )
    }

    fn element(&self) -> Option<ElementKind> {
        match self {
            BindingCategory::StructMember(m) | BindingCategory::AtomicVariable(m) => {
                Some(m.data_type)
            }
            BindingCategory::Array(a) | BindingCategory::InlineArray(_, a) => Some(a.element),
            _ => None,
        }
    }

    /// plain data that can be written by copy
    pub fn is_bytes(&self) -> bool {
        match self.element() {
            Some(
                ElementKind::Pointer
                | ElementKind::Texture
                | ElementKind::Sampler
                | ElementKind::RenderPipeline
                | ElementKind::IndirectCommandBuffer,
            ) => false,
            Some(_) => true,
            None => false,
        }
    }

    pub fn is_texture(&self) -> bool {
        self.element() == Some(ElementKind::Texture)
    }

    pub fn is_sampler(&self) -> bool {
        self.element() == Some(ElementKind::Sampler)
    }

    pub fn is_render_pipeline(&self) -> bool {
        self.element() == Some(ElementKind::RenderPipeline)
    }

    pub fn is_indirect_command_buffer(&self) -> bool {
        self.element() == Some(ElementKind::IndirectCommandBuffer)
    }

    /// number of symbolic path tokens this category accounts for
    pub fn token_count(&self) -> usize {
        match self {
            BindingCategory::StructMember(_)
            | BindingCategory::Array(_)
            | BindingCategory::InlineArray(..) => 1,
            category => match category.argument() {
                Some(a) if a.array_length > 1 => 2,
                Some(_) => 1,
                None => 0,
            },
        }
    }
}

impl fmt::Display for BindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingCategory::Argument(a) => write!(f, "argument '{}'", a.name),
            BindingCategory::ArgumentContainingIndirectionTable(a, _) => {
                write!(f, "argument table '{}'", a.name)
            }
            BindingCategory::TextureArgument(a) => write!(f, "texture argument '{}'", a.name),
            BindingCategory::SamplerArgument(a) => write!(f, "sampler argument '{}'", a.name),
            BindingCategory::EncodableArgument(a, _) => {
                write!(f, "encodable argument '{}'", a.name)
            }
            BindingCategory::IndirectionTable(_) => write!(f, "nested argument table"),
            BindingCategory::StructMember(m) => write!(f, "struct member '{}'", m.name),
            BindingCategory::Array(a) => write!(f, "array of {} {:?}", a.array_length, a.element),
            BindingCategory::Buffer(_) => write!(f, "buffer"),
            BindingCategory::EncodableBuffer(_) => write!(f, "encodable buffer"),
            BindingCategory::InlineArray(_, a) => {
                write!(f, "inline array of {} {:?}", a.array_length, a.element)
            }
            BindingCategory::AtomicVariable(_) => write!(f, "atomic variable"),
        }
    }
}

/// Classifies a root-to-leaf node path, left to right.
///
/// At every position the recognizers are tried in priority order against the same
/// cursor and the first match decides the category and how many nodes it consumes.
pub fn classify(nodes: &[TypeNode<'_>]) -> Result<Vec<BindingCategory>, BindingError> {
    let mut categories = Vec::with_capacity(nodes.len());
    let mut position = 0;

    while position < nodes.len() {
        let cursor = Cursor::new(nodes, position, categories.last());
        let Some((category, consumed)) = RECOGNIZERS
            .iter()
            .find_map(|recognize| recognize(&cursor))
        else {
            return Err(BindingError::Unclassified {
                path: describe_node_path(nodes),
                position,
                previous: cursor
                    .previous()
                    .map_or_else(|| "start".to_string(), |c| c.to_string()),
            });
        };

        debug_assert!(consumed > 0);
        categories.push(category);
        position += consumed;
    }

    Ok(categories)
}
