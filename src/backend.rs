//! The native command-encoding API, as seen by binders.

use std::fmt;
use std::ops::Range;

use crate::classifier::PointerInfo;
use crate::reflection::Access;

pub mod memory;

/// A graphics API providing buffers, textures, samplers and table encoders.
pub trait Backend: Sized {
    type Buffer: Clone + fmt::Debug;
    type Texture: Clone + fmt::Debug;
    type Sampler: Clone + fmt::Debug;
    type RenderPipeline: Clone + fmt::Debug;
    type IndirectCommandBuffer: Clone + fmt::Debug;
    type Function;
    type TableEncoder: TableEncoder<Self>;

    fn buffer_length(buffer: &Self::Buffer) -> usize;

    /// copies into shared, CPU-visible buffer memory
    fn write_buffer(buffer: &Self::Buffer, offset: usize, bytes: &[u8]);

    /// encoder for the table behind the buffer argument at `buffer_slot`
    fn make_table_encoder(
        function: &Self::Function,
        buffer_slot: usize,
        table: &PointerInfo,
    ) -> Self::TableEncoder;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceUsage {
    Read,
    Write,
    ReadWrite,
}

impl From<Access> for ResourceUsage {
    fn from(access: Access) -> Self {
        match access {
            Access::ReadOnly => ResourceUsage::Read,
            Access::WriteOnly => ResourceUsage::Write,
            Access::ReadWrite => ResourceUsage::ReadWrite,
        }
    }
}

/// level of detail range for a sampler binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodClamp {
    pub min: f32,
    pub max: f32,
}

/// Direct slot bindings of a render or compute command encoder.
pub trait CommandEncoder<B: Backend> {
    fn set_bytes(&mut self, bytes: &[u8], slot: usize);

    fn set_buffer(&mut self, buffer: &B::Buffer, offset: usize, slot: usize);

    fn set_buffers(&mut self, buffers: &[B::Buffer], offsets: &[usize], slots: Range<usize>) {
        for ((buffer, offset), slot) in buffers.iter().zip(offsets).zip(slots) {
            self.set_buffer(buffer, *offset, slot);
        }
    }

    fn set_texture(&mut self, texture: &B::Texture, slot: usize);

    fn set_textures(&mut self, textures: &[B::Texture], slots: Range<usize>) {
        for (texture, slot) in textures.iter().zip(slots) {
            self.set_texture(texture, slot);
        }
    }

    fn set_sampler(&mut self, sampler: &B::Sampler, lod_clamp: Option<LodClamp>, slot: usize);

    fn set_samplers(
        &mut self,
        samplers: &[B::Sampler],
        lod_clamps: Option<&[LodClamp]>,
        slots: Range<usize>,
    ) {
        for (i, (sampler, slot)) in samplers.iter().zip(slots).enumerate() {
            let lod_clamp = lod_clamps.and_then(|clamps| clamps.get(i).copied());
            self.set_sampler(sampler, lod_clamp, slot);
        }
    }

    fn set_threadgroup_memory_length(&mut self, length: usize, slot: usize);

    /// makes a buffer referenced from a table resident for the pass
    fn use_resource(&mut self, buffer: &B::Buffer, usage: ResourceUsage);

    fn use_resources(&mut self, buffers: &[B::Buffer], usage: ResourceUsage) {
        for buffer in buffers {
            self.use_resource(buffer, usage);
        }
    }
}

/// Writes resource references and constants into an argument table's memory.
pub trait TableEncoder<B: Backend> {
    /// bytes the table occupies in its backing buffer
    fn encoded_length(&self) -> usize;

    fn set_table_buffer(&mut self, buffer: &B::Buffer, offset: usize);

    fn set_buffer(&mut self, buffer: &B::Buffer, offset: usize, slot: usize);

    fn set_buffers(&mut self, buffers: &[B::Buffer], offsets: &[usize], slots: Range<usize>) {
        for ((buffer, offset), slot) in buffers.iter().zip(offsets).zip(slots) {
            self.set_buffer(buffer, *offset, slot);
        }
    }

    fn set_texture(&mut self, texture: &B::Texture, slot: usize);

    fn set_textures(&mut self, textures: &[B::Texture], slots: Range<usize>) {
        for (texture, slot) in textures.iter().zip(slots) {
            self.set_texture(texture, slot);
        }
    }

    fn set_sampler(&mut self, sampler: &B::Sampler, slot: usize);

    fn set_samplers(&mut self, samplers: &[B::Sampler], slots: Range<usize>) {
        for (sampler, slot) in samplers.iter().zip(slots) {
            self.set_sampler(sampler, slot);
        }
    }

    fn set_render_pipeline(&mut self, pipeline: &B::RenderPipeline, slot: usize);

    fn set_render_pipelines(&mut self, pipelines: &[B::RenderPipeline], slots: Range<usize>) {
        for (pipeline, slot) in pipelines.iter().zip(slots) {
            self.set_render_pipeline(pipeline, slot);
        }
    }

    fn set_indirect_command_buffer(&mut self, buffer: &B::IndirectCommandBuffer, slot: usize);

    fn set_indirect_command_buffers(
        &mut self,
        buffers: &[B::IndirectCommandBuffer],
        slots: Range<usize>,
    ) {
        for (buffer, slot) in buffers.iter().zip(slots) {
            self.set_indirect_command_buffer(buffer, slot);
        }
    }

    /// copies plain data into the constant slot
    fn write_constant(&mut self, slot: usize, bytes: &[u8]);

    /// encoder for the nested table referenced at `slot`
    fn make_child(&self, slot: usize, table: &PointerInfo) -> B::TableEncoder;
}
