//! reflection builders shared by unit tests

use crate::classifier::{ATOMIC_MEMBER, INLINE_ARRAY_MEMBER};
use crate::reflection::*;

fn scalar(scalar_type: ScalarType, element_count: usize) -> DataType {
    DataType::Value(ValueType {
        scalar_type,
        element_count,
    })
}

pub fn int() -> DataType {
    scalar(ScalarType::Int32, 1)
}

pub fn uint() -> DataType {
    scalar(ScalarType::Uint32, 1)
}

pub fn float() -> DataType {
    scalar(ScalarType::Float32, 1)
}

pub fn float4() -> DataType {
    scalar(ScalarType::Float32, 4)
}

pub fn texture() -> DataType {
    DataType::Texture(TextureReferenceType {
        access: Access::ReadOnly,
    })
}

pub fn member(name: &str, offset: usize, data_type: DataType) -> StructMember {
    member_at(name, offset, 0, data_type)
}

pub fn member_at(
    name: &str,
    offset: usize,
    argument_index: usize,
    data_type: DataType,
) -> StructMember {
    StructMember {
        name: name.to_string(),
        offset,
        argument_index,
        data_type,
    }
}

pub fn struct_type(members: Vec<StructMember>) -> DataType {
    DataType::Struct(StructType { members })
}

pub fn array(
    array_length: usize,
    stride: usize,
    argument_index_stride: usize,
    element: DataType,
) -> DataType {
    DataType::Array(ArrayType {
        array_length,
        stride,
        argument_index_stride,
        element: Box::new(element),
    })
}

/// `array<T, N>` as reflection reports it
pub fn inline_array(
    array_length: usize,
    stride: usize,
    argument_index_stride: usize,
    element: DataType,
) -> DataType {
    struct_type(vec![member(
        INLINE_ARRAY_MEMBER,
        0,
        array(array_length, stride, argument_index_stride, element),
    )])
}

pub fn atomic(value: DataType) -> DataType {
    struct_type(vec![member(ATOMIC_MEMBER, 0, value)])
}

pub fn pointer(element: DataType) -> PointerType {
    PointerType {
        access: Access::ReadOnly,
        alignment: 4,
        data_size: 0,
        element_is_argument_buffer: false,
        element: Box::new(element),
    }
}

pub fn table_pointer(element: DataType) -> PointerType {
    PointerType {
        element_is_argument_buffer: true,
        ..pointer(element)
    }
}

pub fn buffer_argument(name: &str, index: usize, pointer: PointerType) -> Argument {
    Argument {
        name: name.to_string(),
        kind: ArgumentKind::Buffer,
        index,
        array_length: 1,
        access: pointer.access,
        buffer_data_size: pointer.data_size,
        buffer_pointer_type: Some(pointer),
    }
}

fn resource_argument(name: &str, kind: ArgumentKind, index: usize, array_length: usize) -> Argument {
    Argument {
        name: name.to_string(),
        kind,
        index,
        array_length,
        access: Access::ReadOnly,
        buffer_data_size: 0,
        buffer_pointer_type: None,
    }
}

pub fn texture_argument(name: &str, index: usize, array_length: usize) -> Argument {
    resource_argument(name, ArgumentKind::Texture, index, array_length)
}

pub fn sampler_argument(name: &str, index: usize, array_length: usize) -> Argument {
    resource_argument(name, ArgumentKind::Sampler, index, array_length)
}

pub fn threadgroup_argument(name: &str, index: usize) -> Argument {
    resource_argument(name, ArgumentKind::ThreadgroupMemory, index, 1)
}

/// `buf` at slot 0: `struct { int i; uint arr[10]; }`
pub fn scenario_buffer() -> Argument {
    let mut pointer = pointer(struct_type(vec![
        member("i", 0, int()),
        member("arr", 4, array(10, 4, 0, uint())),
    ]));
    pointer.data_size = 44;
    buffer_argument("buf", 0, pointer)
}

/// `scene` at slot 1, an argument table:
///
/// ```text
/// struct Scene {
///     float4 color          [[id(0)]];
///     texture2d albedo      [[id(1)]];
///     sampler samplers[2]   [[id(2)]];
///     Light* lights         [[id(4)]];   // Light { float intensity; float range; }
///     Material* material    [[id(5)]];   // argument table { float roughness [[id(0)]]; texture2d normal_map [[id(1)]]; }
///     atomic_int counter    [[id(6)]];
///     array<float, 4> weights [[id(7)]];
///     array<render_pipeline_state, 2> pipelines [[id(11)]];
///     command_buffer commands [[id(13)]];
/// };
/// ```
pub fn scene_table() -> Argument {
    let light = struct_type(vec![member("intensity", 0, float()), member("range", 4, float())]);
    let material = struct_type(vec![
        member_at("roughness", 0, 0, float()),
        member_at("normal_map", 8, 1, texture()),
    ]);

    let mut lights = pointer(light);
    lights.access = Access::ReadWrite;
    lights.data_size = 8;

    let scene = struct_type(vec![
        member_at("color", 0, 0, float4()),
        member_at("albedo", 16, 1, texture()),
        member_at("samplers", 24, 2, array(2, 8, 1, DataType::Sampler)),
        member_at("lights", 40, 4, DataType::Pointer(lights)),
        member_at("material", 48, 5, DataType::Pointer(table_pointer(material))),
        member_at("counter", 56, 6, atomic(int())),
        member_at("weights", 60, 7, inline_array(4, 4, 1, float())),
        member_at("pipelines", 80, 11, array(2, 8, 1, DataType::RenderPipeline)),
        member_at("commands", 96, 13, DataType::IndirectCommandBuffer),
    ]);

    buffer_argument("scene", 1, table_pointer(scene))
}

pub fn path(text: &str) -> crate::paths::SymbolicPath {
    text.parse().unwrap()
}

/// the scenario buffer, the scene table and a few resource roots
pub fn binding_index() -> crate::path_index::PathIndex {
    crate::path_index::PathIndex::new(&[
        scenario_buffer(),
        scene_table(),
        texture_argument("tex", 2, 4),
        sampler_argument("samp", 6, 2),
        sampler_argument("shadow", 8, 1),
        threadgroup_argument("scratch", 0),
    ])
    .unwrap()
}
