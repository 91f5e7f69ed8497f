//! A backend that keeps buffers in host memory and records every binding.
//!
//! Used for dry runs of binding code and by the tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

/// shared host memory, clones alias the same bytes
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    label: Rc<str>,
    contents: Rc<RefCell<Vec<u8>>>,
}

impl MemoryBuffer {
    pub fn new(label: &str, length: usize) -> Self {
        Self {
            label: label.into(),
            contents: Rc::new(RefCell::new(vec![0; length])),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn contents(&self) -> Vec<u8> {
        self.contents.borrow().clone()
    }

    pub fn read(&self, offset: usize, length: usize) -> Vec<u8> {
        self.contents.borrow()[offset..offset + length].to_vec()
    }
}

impl PartialEq for MemoryBuffer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.contents, &other.contents)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTexture(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct MemorySampler(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRenderPipeline(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryIndirectCommandBuffer(pub String);

/// Handle to a compiled function. Table encoders created for it share one log.
#[derive(Debug, Clone, Default)]
pub struct MemoryFunction {
    log: Rc<RefCell<Vec<TableWrite>>>,
}

impl MemoryFunction {
    pub fn table_writes(&self) -> Vec<TableWrite> {
        self.log.borrow().clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableWrite {
    pub table: String,
    pub op: TableOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableOp {
    Attach { buffer: String, offset: usize },
    Buffer { slot: usize, buffer: String, offset: usize },
    Texture { slot: usize, texture: String },
    Sampler { slot: usize, sampler: String },
    RenderPipeline { slot: usize, pipeline: String },
    IndirectCommandBuffer { slot: usize, buffer: String },
    Constant { slot: usize, bytes: Vec<u8> },
}

#[derive(Debug)]
pub struct MemoryTableEncoder {
    label: String,
    encoded_length: usize,
    log: Rc<RefCell<Vec<TableWrite>>>,
}

impl MemoryTableEncoder {
    pub fn label(&self) -> &str {
        &self.label
    }

    fn record(&self, op: TableOp) {
        self.log.borrow_mut().push(TableWrite {
            table: self.label.clone(),
            op,
        });
    }
}

impl Backend for MemoryBackend {
    type Buffer = MemoryBuffer;
    type Texture = MemoryTexture;
    type Sampler = MemorySampler;
    type RenderPipeline = MemoryRenderPipeline;
    type IndirectCommandBuffer = MemoryIndirectCommandBuffer;
    type Function = MemoryFunction;
    type TableEncoder = MemoryTableEncoder;

    fn buffer_length(buffer: &MemoryBuffer) -> usize {
        buffer.contents.borrow().len()
    }

    fn write_buffer(buffer: &MemoryBuffer, offset: usize, bytes: &[u8]) {
        buffer.contents.borrow_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn make_table_encoder(
        function: &MemoryFunction,
        buffer_slot: usize,
        table: &PointerInfo,
    ) -> MemoryTableEncoder {
        MemoryTableEncoder {
            label: format!("table@{buffer_slot}"),
            encoded_length: table.data_size,
            log: function.log.clone(),
        }
    }
}

impl TableEncoder<MemoryBackend> for MemoryTableEncoder {
    fn encoded_length(&self) -> usize {
        self.encoded_length
    }

    fn set_table_buffer(&mut self, buffer: &MemoryBuffer, offset: usize) {
        self.record(TableOp::Attach {
            buffer: buffer.label().to_string(),
            offset,
        });
    }

    fn set_buffer(&mut self, buffer: &MemoryBuffer, offset: usize, slot: usize) {
        self.record(TableOp::Buffer {
            slot,
            buffer: buffer.label().to_string(),
            offset,
        });
    }

    fn set_texture(&mut self, texture: &MemoryTexture, slot: usize) {
        self.record(TableOp::Texture {
            slot,
            texture: texture.0.clone(),
        });
    }

    fn set_sampler(&mut self, sampler: &MemorySampler, slot: usize) {
        self.record(TableOp::Sampler {
            slot,
            sampler: sampler.0.clone(),
        });
    }

    fn set_render_pipeline(&mut self, pipeline: &MemoryRenderPipeline, slot: usize) {
        self.record(TableOp::RenderPipeline {
            slot,
            pipeline: pipeline.0.clone(),
        });
    }

    fn set_indirect_command_buffer(&mut self, buffer: &MemoryIndirectCommandBuffer, slot: usize) {
        self.record(TableOp::IndirectCommandBuffer {
            slot,
            buffer: buffer.0.clone(),
        });
    }

    fn write_constant(&mut self, slot: usize, bytes: &[u8]) {
        self.record(TableOp::Constant {
            slot,
            bytes: bytes.to_vec(),
        });
    }

    fn make_child(&self, slot: usize, table: &PointerInfo) -> MemoryTableEncoder {
        MemoryTableEncoder {
            label: format!("{}/{slot}", self.label),
            encoded_length: table.data_size,
            log: self.log.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetBytes {
        slot: usize,
        bytes: Vec<u8>,
    },
    SetBuffer {
        slot: usize,
        buffer: String,
        offset: usize,
    },
    SetTexture {
        slot: usize,
        texture: String,
    },
    SetSampler {
        slot: usize,
        sampler: String,
        lod_clamp: Option<LodClamp>,
    },
    SetThreadgroupMemoryLength {
        slot: usize,
        length: usize,
    },
    UseResource {
        buffer: String,
        usage: ResourceUsage,
    },
}

/// a command encoder that only remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingEncoder {
    pub commands: Vec<Command>,
}

impl CommandEncoder<MemoryBackend> for RecordingEncoder {
    fn set_bytes(&mut self, bytes: &[u8], slot: usize) {
        self.commands.push(Command::SetBytes {
            slot,
            bytes: bytes.to_vec(),
        });
    }

    fn set_buffer(&mut self, buffer: &MemoryBuffer, offset: usize, slot: usize) {
        self.commands.push(Command::SetBuffer {
            slot,
            buffer: buffer.label().to_string(),
            offset,
        });
    }

    fn set_texture(&mut self, texture: &MemoryTexture, slot: usize) {
        self.commands.push(Command::SetTexture {
            slot,
            texture: texture.0.clone(),
        });
    }

    fn set_sampler(&mut self, sampler: &MemorySampler, lod_clamp: Option<LodClamp>, slot: usize) {
        self.commands.push(Command::SetSampler {
            slot,
            sampler: sampler.0.clone(),
            lod_clamp,
        });
    }

    fn set_threadgroup_memory_length(&mut self, length: usize, slot: usize) {
        self.commands
            .push(Command::SetThreadgroupMemoryLength { slot, length });
    }

    fn use_resource(&mut self, buffer: &MemoryBuffer, usage: ResourceUsage) {
        self.commands.push(Command::UseResource {
            buffer: buffer.label().to_string(),
            usage,
        });
    }
}
