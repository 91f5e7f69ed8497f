use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

mod type_graph;
pub use type_graph::*;

/// Function signatures as dumped by the offline reflection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionJson {
    pub source_file_name: String,
    pub functions: Vec<ReflectedFunction>,
}

impl ReflectionJson {
    pub fn function(&self, name: &str) -> Option<&ReflectedFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

pub fn load_reflection_json(path: impl AsRef<Path>) -> anyhow::Result<ReflectionJson> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read reflection json: {}", path.display()))?;
    let reflection = serde_json::from_str(&json)
        .with_context(|| format!("invalid reflection json: {}", path.display()))?;

    Ok(reflection)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedFunction {
    pub name: String,
    pub stage: FunctionStage,
    pub arguments: Vec<Argument>,
}

impl ReflectedFunction {
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionStage {
    Vertex,
    Fragment,
    Compute,
}

/// a top-level function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub kind: ArgumentKind,
    pub index: usize,
    #[serde(default = "single")]
    pub array_length: usize,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub buffer_data_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub buffer_pointer_type: Option<PointerType>,
}

fn single() -> usize {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentKind {
    Buffer,
    Texture,
    Sampler,
    ThreadgroupMemory,
    ImageblockData,
    Imageblock,
    VisibleFunctionTable,
    IntersectionFunctionTable,
    InstanceAccelerationStructure,
    PrimitiveAccelerationStructure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    #[default]
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataType {
    Value(ValueType),
    Struct(StructType),
    Array(ArrayType),
    Pointer(PointerType),
    Texture(TextureReferenceType),
    Sampler,
    RenderPipeline,
    IndirectCommandBuffer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueType {
    pub scalar_type: ScalarType,
    #[serde(default = "single")]
    pub element_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarType {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float16,
    Float32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    pub members: Vec<StructMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructMember {
    pub name: String,
    pub offset: usize,
    /// slot of the member inside an argument table
    #[serde(default)]
    pub argument_index: usize,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    pub array_length: usize,
    pub stride: usize,
    #[serde(default)]
    pub argument_index_stride: usize,
    pub element: Box<DataType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerType {
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub alignment: usize,
    #[serde(default)]
    pub data_size: usize,
    /// the pointee is an argument table populated through a table encoder
    #[serde(default)]
    pub element_is_argument_buffer: bool,
    pub element: Box<DataType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureReferenceType {
    #[serde(default)]
    pub access: Access,
}
