//! Deferred command encoding: record bindings once, replay them on many passes.

use std::collections::{BTreeMap, BTreeSet};

use log::*;

use crate::backend::{Backend, CommandEncoder, LodClamp, ResourceUsage};
use crate::error::BindingError;
use crate::reflection::{Argument, ArgumentKind};

/// Texture and sampler slots a function reads, all of which must be bound before
/// a recorded group is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupLayout {
    pub texture_slots: BTreeSet<usize>,
    pub sampler_slots: BTreeSet<usize>,
}

impl GroupLayout {
    pub fn new(arguments: &[Argument]) -> Self {
        let mut layout = Self::default();

        for argument in arguments {
            let slots = argument.index..argument.index + argument.array_length;
            match argument.kind {
                ArgumentKind::Texture => layout.texture_slots.extend(slots),
                ArgumentKind::Sampler => layout.sampler_slots.extend(slots),
                _ => {}
            }
        }

        layout
    }
}

struct SamplerBinding<B: Backend> {
    sampler: B::Sampler,
    lod_clamp: Option<LodClamp>,
}

struct ResourceBinding<B: Backend> {
    /// buffer slot that was bound last when the resource was declared
    owner: Option<usize>,
    buffer: B::Buffer,
    usage: ResourceUsage,
}

/// A [`CommandEncoder`] that records bindings and replays them with
/// [`EncoderGroup::apply_on`].
///
/// Resources declared with `use_resource` belong to the buffer slot bound just
/// before them and are dropped when that slot is rebound.
pub struct EncoderGroup<B: Backend> {
    layout: GroupLayout,
    buffers: BTreeMap<usize, (B::Buffer, usize)>,
    bytes: BTreeMap<usize, Vec<u8>>,
    textures: BTreeMap<usize, B::Texture>,
    samplers: BTreeMap<usize, SamplerBinding<B>>,
    threadgroup_memory: BTreeMap<usize, usize>,
    resources: Vec<ResourceBinding<B>>,
    last_buffer_slot: Option<usize>,
}

impl<B: Backend> EncoderGroup<B> {
    pub fn new(layout: GroupLayout) -> Self {
        Self {
            layout,
            buffers: BTreeMap::new(),
            bytes: BTreeMap::new(),
            textures: BTreeMap::new(),
            samplers: BTreeMap::new(),
            threadgroup_memory: BTreeMap::new(),
            resources: vec![],
            last_buffer_slot: None,
        }
    }

    pub fn layout(&self) -> &GroupLayout {
        &self.layout
    }

    fn claim_buffer_slot(&mut self, slot: usize) {
        self.buffers.remove(&slot);
        self.bytes.remove(&slot);
        self.resources.retain(|resource| resource.owner != Some(slot));
        self.last_buffer_slot = Some(slot);
    }

    /// Replays every recorded binding on `commands`.
    pub fn apply_on(&self, commands: &mut dyn CommandEncoder<B>) -> Result<(), BindingError> {
        let bound_textures = self
            .layout
            .texture_slots
            .iter()
            .filter(|&slot| self.textures.contains_key(slot))
            .count();
        if bound_textures != self.layout.texture_slots.len() {
            return Err(BindingError::MissingTextureBindings {
                expected: self.layout.texture_slots.len(),
                bound: bound_textures,
            });
        }

        let bound_samplers = self
            .layout
            .sampler_slots
            .iter()
            .filter(|&slot| self.samplers.contains_key(slot))
            .count();
        if bound_samplers != self.layout.sampler_slots.len() {
            return Err(BindingError::MissingSamplerBindings {
                expected: self.layout.sampler_slots.len(),
                bound: bound_samplers,
            });
        }

        for (&slot, bytes) in &self.bytes {
            commands.set_bytes(bytes, slot);
        }
        for (&slot, (buffer, offset)) in &self.buffers {
            commands.set_buffer(buffer, *offset, slot);
        }
        for (&slot, texture) in &self.textures {
            commands.set_texture(texture, slot);
        }
        for (&slot, binding) in &self.samplers {
            commands.set_sampler(&binding.sampler, binding.lod_clamp, slot);
        }
        for (&slot, &length) in &self.threadgroup_memory {
            commands.set_threadgroup_memory_length(length, slot);
        }
        for resource in &self.resources {
            commands.use_resource(&resource.buffer, resource.usage);
        }

        Ok(())
    }
}

impl<B: Backend> CommandEncoder<B> for EncoderGroup<B> {
    fn set_bytes(&mut self, bytes: &[u8], slot: usize) {
        self.claim_buffer_slot(slot);
        self.bytes.insert(slot, bytes.to_vec());
    }

    fn set_buffer(&mut self, buffer: &B::Buffer, offset: usize, slot: usize) {
        self.claim_buffer_slot(slot);
        self.buffers.insert(slot, (buffer.clone(), offset));
    }

    fn set_texture(&mut self, texture: &B::Texture, slot: usize) {
        if !self.layout.texture_slots.contains(&slot) {
            warn!("texture bound to slot {slot}, which the function does not read");
        }
        self.textures.insert(slot, texture.clone());
    }

    fn set_sampler(&mut self, sampler: &B::Sampler, lod_clamp: Option<LodClamp>, slot: usize) {
        if !self.layout.sampler_slots.contains(&slot) {
            warn!("sampler bound to slot {slot}, which the function does not read");
        }
        self.samplers.insert(
            slot,
            SamplerBinding {
                sampler: sampler.clone(),
                lod_clamp,
            },
        );
    }

    fn set_threadgroup_memory_length(&mut self, length: usize, slot: usize) {
        self.threadgroup_memory.insert(slot, length);
    }

    fn use_resource(&mut self, buffer: &B::Buffer, usage: ResourceUsage) {
        if self.last_buffer_slot.is_none() {
            warn!("resource {buffer:?} declared before any buffer was bound");
        }
        self.resources.push(ResourceBinding {
            owner: self.last_buffer_slot,
            buffer: buffer.clone(),
            usage,
        });
    }
}
