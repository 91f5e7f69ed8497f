use super::*;
use crate::address::resolve_slot_index;
use crate::backend::{ResourceUsage, TableEncoder};
use crate::reflection::Access;

/// Binds into an argument table through a table encoder.
///
/// Paths are relative to the table. A buffer must be attached exactly once before
/// any write. Nested tables are reached through [`TableBinder::child_table`].
pub struct TableBinder<'a, B: Backend> {
    encoding: Encoding<'a>,
    /// slot of the table buffer in the parent table or the command encoder
    slot: usize,
    access: Access,
    encoder: B::TableEncoder,
    parent: Option<&'a mut B::TableEncoder>,
    commands: &'a mut dyn CommandEncoder<B>,
    attached: bool,
}

impl<'a, B: Backend> TableBinder<'a, B> {
    pub fn new(
        encoding: Encoding<'a>,
        slot: usize,
        encoder: B::TableEncoder,
        parent: Option<&'a mut B::TableEncoder>,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Self {
        let access = encoding
            .category()
            .pointer()
            .map_or(Access::ReadOnly, |pointer| pointer.access);

        Self {
            encoding,
            slot,
            access,
            encoder,
            parent,
            commands,
            attached: false,
        }
    }

    pub fn encoded_length(&self) -> usize {
        self.encoder.encoded_length()
    }

    pub fn attach_buffer(&mut self, buffer: &B::Buffer, offset: usize) -> Result<(), BindingError> {
        if self.attached {
            return Err(BindingError::BufferAlreadyAttached);
        }
        check_buffer_length::<B>(buffer, offset, self.encoded_length())?;

        self.encoder.set_table_buffer(buffer, offset);
        match self.parent.as_deref_mut() {
            Some(parent) => {
                parent.set_buffer(buffer, offset, self.slot);
                self.commands
                    .use_resource(buffer, ResourceUsage::from(self.access));
            }
            None => self.commands.set_buffer(buffer, offset, self.slot),
        }

        self.attached = true;
        Ok(())
    }

    fn ensure_attached(&self) -> Result<(), BindingError> {
        if !self.attached {
            return Err(BindingError::NoBackingBuffer);
        }

        Ok(())
    }

    /// slot of the destination at `path`, checked against `is_expected`
    fn slot_of(
        &self,
        path: &SymbolicPath,
        expected: &'static str,
        is_expected: impl Fn(&BindingCategory) -> bool,
    ) -> Result<(usize, &'a BindingCategory), BindingError> {
        self.ensure_attached()?;

        let local = self.encoding.local_category_sequence(path)?;
        let category = destination(path, local)?;
        expect_category(path, category, expected, is_expected)?;

        Ok((resolve_slot_index(path.tokens(), &local[1..])?, category))
    }

    /// Resolves the start of a whole-array bind of `count` elements.
    ///
    /// A path ending in an explicit index starts there. A path naming the array
    /// itself starts at element 0.
    fn array_slot_of(
        &self,
        path: &SymbolicPath,
        count: usize,
        expected: &'static str,
        is_expected: impl Fn(&BindingCategory) -> bool,
    ) -> Result<(usize, &'a BindingCategory), BindingError> {
        self.ensure_attached()?;

        let mut path = path.clone();
        let mut local = self.encoding.local_category_sequence(&path)?;
        if !local.last().is_some_and(BindingCategory::is_array) {
            let candidate = path.clone().index(0);
            let candidate_local = self.encoding.candidate_local_category_sequence(&candidate);
            if candidate_local.len() > local.len() && candidate_local[local.len()].is_array() {
                path = candidate;
                local = candidate_local;
            }
        }

        let category = destination(&path, local)?;
        expect_category(&path, category, expected, is_expected)?;

        let array = local
            .iter()
            .rposition(BindingCategory::is_array)
            .filter(|&position| local[position + 1..].iter().all(|c| c.token_count() == 0))
            .and_then(|position| local[position].array());
        match array {
            Some(array) => check_range(
                path.last().index().unwrap_or(0),
                count,
                array.array_length,
            )?,
            None => check_range(0, count, 1)?,
        }

        Ok((resolve_slot_index(path.tokens(), &local[1..])?, category))
    }

    pub fn write_bytes_at(&mut self, path: &SymbolicPath, bytes: &[u8]) -> Result<(), BindingError> {
        let (slot, _) = self.slot_of(path, "plain data", BindingCategory::is_bytes)?;
        self.encoder.write_constant(slot, bytes);
        Ok(())
    }

    pub fn write_value_at<T: GPUWrite + ?Sized>(
        &mut self,
        path: &SymbolicPath,
        value: &T,
    ) -> Result<(), BindingError> {
        self.write_bytes_at(path, &value.to_gpu_bytes())
    }

    pub fn write_values_at<T: GPUWrite>(
        &mut self,
        path: &SymbolicPath,
        values: &[T],
    ) -> Result<(), BindingError> {
        let writes = element_paths(path, values.len())
            .iter()
            .zip(values)
            .map(|(element, value)| {
                let (slot, _) = self.slot_of(element, "plain data", BindingCategory::is_bytes)?;
                Ok((slot, value.to_gpu_bytes()))
            })
            .collect::<Result<Vec<_>, BindingError>>()?;

        for (slot, bytes) in writes {
            self.encoder.write_constant(slot, &bytes);
        }
        Ok(())
    }

    pub fn bind_buffer_at(
        &mut self,
        path: &SymbolicPath,
        buffer: &B::Buffer,
        offset: usize,
    ) -> Result<(), BindingError> {
        let (slot, category) = self.slot_of(path, "buffer", BindingCategory::is_buffer)?;
        let usage = buffer_usage(category);

        self.encoder.set_buffer(buffer, offset, slot);
        self.commands.use_resource(buffer, usage);
        Ok(())
    }

    pub fn bind_buffers_at(
        &mut self,
        path: &SymbolicPath,
        buffers: &[B::Buffer],
        offsets: &[usize],
    ) -> Result<(), BindingError> {
        check_lengths(buffers.len(), offsets.len())?;
        let (slot, category) =
            self.array_slot_of(path, buffers.len(), "buffer", BindingCategory::is_buffer)?;
        let usage = buffer_usage(category);

        self.encoder
            .set_buffers(buffers, offsets, slot..slot + buffers.len());
        self.commands.use_resources(buffers, usage);
        Ok(())
    }

    /// the child encoding for `path`, which must end at the boundary it opens
    fn child_encoding(&self, path: &SymbolicPath) -> Result<(Encoding<'a>, usize), BindingError> {
        self.ensure_attached()?;

        let child = self.encoding.child_encoding(path)?;
        let local = self.encoding.local_sequence_to(&child);
        let full = self.encoding.local_category_sequence(path)?;
        if full.len() != local.len() {
            return Err(BindingError::InvalidChildPath(path.to_string()));
        }

        let slot = resolve_slot_index(path.tokens(), &local[1..])?;
        Ok((child, slot))
    }

    pub fn bind_encodable_buffer_at<F>(
        &mut self,
        path: &SymbolicPath,
        buffer: &B::Buffer,
        offset: usize,
        configure: F,
    ) -> Result<(), BindingError>
    where
        F: FnOnce(&mut EncodableBufferWriter<'_, B>) -> Result<(), BindingError>,
    {
        let (child, slot) = self.child_encoding(path)?;
        let BindingCategory::EncodableBuffer(pointer) = child.category() else {
            return Err(BindingError::UnexpectedCategory {
                path: path.to_string(),
                expected: "encodable buffer",
                found: child.category().to_string(),
            });
        };
        check_buffer_length::<B>(buffer, offset, pointer.data_size)?;

        self.encoder.set_buffer(buffer, offset, slot);
        self.commands
            .use_resource(buffer, ResourceUsage::from(pointer.access));

        let mut writer = EncodableBufferWriter::new(child, buffer, offset);
        configure(&mut writer)
    }

    pub fn bind_texture_at(
        &mut self,
        path: &SymbolicPath,
        texture: &B::Texture,
    ) -> Result<(), BindingError> {
        let (slot, _) = self.slot_of(path, "texture", BindingCategory::is_texture)?;
        self.encoder.set_texture(texture, slot);
        Ok(())
    }

    pub fn bind_textures_at(
        &mut self,
        path: &SymbolicPath,
        textures: &[B::Texture],
    ) -> Result<(), BindingError> {
        let (slot, _) =
            self.array_slot_of(path, textures.len(), "texture", BindingCategory::is_texture)?;
        self.encoder.set_textures(textures, slot..slot + textures.len());
        Ok(())
    }

    pub fn bind_sampler_at(
        &mut self,
        path: &SymbolicPath,
        sampler: &B::Sampler,
    ) -> Result<(), BindingError> {
        let (slot, _) = self.slot_of(path, "sampler", BindingCategory::is_sampler)?;
        self.encoder.set_sampler(sampler, slot);
        Ok(())
    }

    pub fn bind_samplers_at(
        &mut self,
        path: &SymbolicPath,
        samplers: &[B::Sampler],
    ) -> Result<(), BindingError> {
        let (slot, _) =
            self.array_slot_of(path, samplers.len(), "sampler", BindingCategory::is_sampler)?;
        self.encoder.set_samplers(samplers, slot..slot + samplers.len());
        Ok(())
    }

    pub fn bind_render_pipeline_at(
        &mut self,
        path: &SymbolicPath,
        pipeline: &B::RenderPipeline,
    ) -> Result<(), BindingError> {
        let (slot, _) =
            self.slot_of(path, "render pipeline", BindingCategory::is_render_pipeline)?;
        self.encoder.set_render_pipeline(pipeline, slot);
        Ok(())
    }

    pub fn bind_render_pipelines_at(
        &mut self,
        path: &SymbolicPath,
        pipelines: &[B::RenderPipeline],
    ) -> Result<(), BindingError> {
        let (slot, _) = self.array_slot_of(
            path,
            pipelines.len(),
            "render pipeline",
            BindingCategory::is_render_pipeline,
        )?;
        self.encoder
            .set_render_pipelines(pipelines, slot..slot + pipelines.len());
        Ok(())
    }

    pub fn bind_indirect_command_buffer_at(
        &mut self,
        path: &SymbolicPath,
        buffer: &B::IndirectCommandBuffer,
    ) -> Result<(), BindingError> {
        let (slot, _) = self.slot_of(
            path,
            "indirect command buffer",
            BindingCategory::is_indirect_command_buffer,
        )?;
        self.encoder.set_indirect_command_buffer(buffer, slot);
        Ok(())
    }

    pub fn bind_indirect_command_buffers_at(
        &mut self,
        path: &SymbolicPath,
        buffers: &[B::IndirectCommandBuffer],
    ) -> Result<(), BindingError> {
        let (slot, _) = self.array_slot_of(
            path,
            buffers.len(),
            "indirect command buffer",
            BindingCategory::is_indirect_command_buffer,
        )?;
        self.encoder
            .set_indirect_command_buffers(buffers, slot..slot + buffers.len());
        Ok(())
    }

    pub fn child_table(&mut self, path: &SymbolicPath) -> Result<TableBinder<'_, B>, BindingError> {
        let (child, slot) = self.child_encoding(path)?;
        let BindingCategory::IndirectionTable(pointer) = child.category() else {
            return Err(BindingError::UnexpectedCategory {
                path: path.to_string(),
                expected: "argument table",
                found: child.category().to_string(),
            });
        };
        debug!("opening nested table at {path} (slot {slot})");

        let encoder = self.encoder.make_child(slot, pointer);
        Ok(TableBinder::new(
            child,
            slot,
            encoder,
            Some(&mut self.encoder),
            &mut *self.commands,
        ))
    }
}

fn buffer_usage(category: &BindingCategory) -> ResourceUsage {
    category
        .pointer()
        .map_or(ResourceUsage::Read, |pointer| ResourceUsage::from(pointer.access))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::*;
    use crate::path_index::PathIndex;
    use crate::test_support::*;

    fn scene<'a>(
        index: &'a PathIndex,
        function: &MemoryFunction,
        commands: &'a mut RecordingEncoder,
    ) -> RootBinder<'a, MemoryBackend> {
        make_root_binder::<MemoryBackend>(index.encoding("scene").unwrap(), function, commands)
            .unwrap()
    }

    fn ops(function: &MemoryFunction, table: &str) -> Vec<TableOp> {
        function
            .table_writes()
            .into_iter()
            .filter(|write| write.table == table)
            .map(|write| write.op)
            .collect()
    }

    #[test]
    fn writes_require_an_attached_buffer() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let args = MemoryBuffer::new("args", 64);

        let mut binder = scene(&index, &function, &mut commands);
        assert_eq!(
            binder.write_value_at(&path("color"), &1.0f32),
            Err(BindingError::NoBackingBuffer)
        );
        assert!(matches!(
            binder.child_table(&path("material")),
            Err(BindingError::NoBackingBuffer)
        ));

        binder.attach_buffer(&args, 0).unwrap();
        assert_eq!(
            binder.attach_buffer(&args, 0),
            Err(BindingError::BufferAlreadyAttached)
        );
        drop(binder);

        assert_eq!(
            commands.commands,
            vec![Command::SetBuffer {
                slot: 1,
                buffer: "args".to_string(),
                offset: 0
            }]
        );
        assert_eq!(
            ops(&function, "table@1"),
            vec![TableOp::Attach {
                buffer: "args".to_string(),
                offset: 0
            }]
        );
    }

    #[test]
    fn members_resolve_to_table_slots() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let linear = MemorySampler("linear".to_string());
        let nearest = MemorySampler("nearest".to_string());

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();
        binder
            .bind_texture_at(&path("albedo"), &MemoryTexture("brick".to_string()))
            .unwrap();
        binder
            .bind_samplers_at(&path("samplers"), &[linear.clone(), nearest.clone()])
            .unwrap();
        binder.bind_sampler_at(&path("samplers[1]"), &linear).unwrap();
        binder.write_value_at(&path("weights[2]"), &0.5f32).unwrap();
        binder.write_value_at(&path("counter"), &3i32).unwrap();
        drop(binder);

        assert_eq!(
            ops(&function, "table@1")[1..],
            [
                TableOp::Texture {
                    slot: 1,
                    texture: "brick".to_string()
                },
                TableOp::Sampler {
                    slot: 2,
                    sampler: "linear".to_string()
                },
                TableOp::Sampler {
                    slot: 3,
                    sampler: "nearest".to_string()
                },
                TableOp::Sampler {
                    slot: 3,
                    sampler: "linear".to_string()
                },
                TableOp::Constant {
                    slot: 9,
                    bytes: 0.5f32.to_le_bytes().to_vec()
                },
                TableOp::Constant {
                    slot: 6,
                    bytes: 3i32.to_le_bytes().to_vec()
                },
            ]
        );
    }

    #[test]
    fn whole_arrays_are_bounds_checked() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let sampler = MemorySampler("linear".to_string());

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();

        assert_eq!(
            binder.bind_samplers_at(&path("samplers[1]"), &[sampler.clone(), sampler.clone()]),
            Err(BindingError::ArrayOutOfBounds {
                start: 1,
                count: 2,
                length: 2
            })
        );
        assert_eq!(
            binder.write_values_at(&path("weights[2]"), &[1.0f32, 2.0, 3.0]),
            Err(BindingError::IndexOutOfBounds {
                position: 1,
                index: 4,
                length: 4
            })
        );
        binder
            .write_values_at(&path("weights"), &[1.0f32, 2.0, 3.0, 4.0])
            .unwrap();
        drop(binder);

        let slots: Vec<usize> = ops(&function, "table@1")
            .iter()
            .filter_map(|op| match op {
                TableOp::Constant { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(slots, [7, 8, 9, 10]);
    }

    #[test]
    fn overflowing_array_starts_are_out_of_bounds() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let sampler = MemorySampler("linear".to_string());

        let mut binder = scene(&index, &function, &mut commands);
        assert_eq!(
            binder.attach_buffer(&MemoryBuffer::new("args", 64), usize::MAX),
            Err(BindingError::BufferTooShort {
                required: usize::MAX,
                available: 64
            })
        );
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();

        assert_eq!(
            binder.bind_samplers_at(
                &path("samplers[18446744073709551615]"),
                &[sampler.clone(), sampler]
            ),
            Err(BindingError::ArrayOutOfBounds {
                start: usize::MAX,
                count: 2,
                length: 2
            })
        );
        assert!(
            binder
                .write_values_at(&path("weights[18446744073709551615]"), &[1.0f32, 2.0])
                .is_err()
        );
        drop(binder);

        assert_eq!(ops(&function, "table@1").len(), 1);
    }

    #[test]
    fn render_pipelines_and_command_buffers_bind_into_the_table() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let opaque = MemoryRenderPipeline("opaque".to_string());
        let blended = MemoryRenderPipeline("blended".to_string());

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 128), 0).unwrap();
        binder
            .bind_render_pipelines_at(&path("pipelines"), &[opaque.clone(), blended])
            .unwrap();
        binder
            .bind_render_pipeline_at(&path("pipelines[1]"), &opaque)
            .unwrap();
        binder
            .bind_indirect_command_buffer_at(
                &path("commands"),
                &MemoryIndirectCommandBuffer("draws".to_string()),
            )
            .unwrap();

        assert_eq!(
            binder.bind_render_pipelines_at(
                &path("pipelines[1]"),
                &[opaque.clone(), opaque.clone()]
            ),
            Err(BindingError::ArrayOutOfBounds {
                start: 1,
                count: 2,
                length: 2
            })
        );
        assert!(matches!(
            binder.bind_render_pipeline_at(&path("albedo"), &opaque),
            Err(BindingError::UnexpectedCategory {
                expected: "render pipeline",
                ..
            })
        ));
        assert!(matches!(
            binder.bind_indirect_command_buffer_at(
                &path("pipelines[0]"),
                &MemoryIndirectCommandBuffer("draws".to_string())
            ),
            Err(BindingError::UnexpectedCategory {
                expected: "indirect command buffer",
                ..
            })
        ));
        assert!(matches!(
            binder.write_value_at(&path("pipelines[0]"), &1u64),
            Err(BindingError::UnexpectedCategory {
                expected: "plain data",
                ..
            })
        ));
        assert!(matches!(
            binder.write_value_at(&path("commands"), &1u64),
            Err(BindingError::UnexpectedCategory { .. })
        ));
        drop(binder);

        assert_eq!(
            ops(&function, "table@1")[1..],
            [
                TableOp::RenderPipeline {
                    slot: 11,
                    pipeline: "opaque".to_string()
                },
                TableOp::RenderPipeline {
                    slot: 12,
                    pipeline: "blended".to_string()
                },
                TableOp::RenderPipeline {
                    slot: 12,
                    pipeline: "opaque".to_string()
                },
                TableOp::IndirectCommandBuffer {
                    slot: 13,
                    buffer: "draws".to_string()
                },
            ]
        );
    }

    #[test]
    fn wrong_destinations_are_rejected() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();

        assert!(matches!(
            binder.bind_texture_at(&path("color"), &MemoryTexture("t".to_string())),
            Err(BindingError::UnexpectedCategory {
                expected: "texture",
                ..
            })
        ));
        assert_eq!(
            binder.write_value_at(&path("lights.range"), &1.0f32),
            Err(BindingError::CrossesBoundary("lights.range".to_string()))
        );
        assert!(matches!(
            binder.write_value_at(&path("colour"), &1.0f32),
            Err(BindingError::UnknownPath(_))
        ));
        assert!(matches!(
            binder.child_table(&path("color")),
            Err(BindingError::InvalidChildPath(_))
        ));
        assert!(matches!(
            binder.child_table(&path("lights")),
            Err(BindingError::UnexpectedCategory { .. })
        ));
        assert!(matches!(
            binder.child_table(&path("material.roughness")),
            Err(BindingError::InvalidChildPath(_))
        ));
    }

    #[test]
    fn encodable_buffer_is_bound_and_filled() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let light = MemoryBuffer::new("light", 8);

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();

        assert_eq!(
            binder.bind_encodable_buffer_at(&path("lights"), &MemoryBuffer::new("small", 4), 0, |_| {
                Ok(())
            }),
            Err(BindingError::BufferTooShort {
                required: 8,
                available: 4
            })
        );
        assert!(matches!(
            binder.bind_encodable_buffer_at(&path("lights.range"), &light, 0, |_| Ok(())),
            Err(BindingError::InvalidChildPath(_))
        ));

        binder
            .bind_encodable_buffer_at(&path("lights"), &light, 0, |writer| {
                writer.write_value_at(&path("intensity"), &2.0f32)?;
                writer.write_value_at(&path("range"), &10.0f32)
            })
            .unwrap();
        drop(binder);

        assert_eq!(light.read(0, 4), 2.0f32.to_le_bytes());
        assert_eq!(light.read(4, 4), 10.0f32.to_le_bytes());
        assert_eq!(
            ops(&function, "table@1")[1..],
            [TableOp::Buffer {
                slot: 4,
                buffer: "light".to_string(),
                offset: 0
            }]
        );
        assert_eq!(
            commands.commands[1..],
            [Command::UseResource {
                buffer: "light".to_string(),
                usage: ResourceUsage::ReadWrite
            }]
        );
    }

    #[test]
    fn nested_tables_encode_into_their_own_buffer() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();
        let material = MemoryBuffer::new("material", 16);

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();
        {
            let mut child = binder.child_table(&path("material")).unwrap();
            assert_eq!(
                child.write_value_at(&path("roughness"), &0.25f32),
                Err(BindingError::NoBackingBuffer)
            );
            child.attach_buffer(&material, 0).unwrap();
            child.write_value_at(&path("roughness"), &0.25f32).unwrap();
            child
                .bind_texture_at(&path("normal_map"), &MemoryTexture("bumps".to_string()))
                .unwrap();
        }
        binder
            .bind_texture_at(&path("albedo"), &MemoryTexture("brick".to_string()))
            .unwrap();
        drop(binder);

        assert_eq!(
            ops(&function, "table@1")[1..],
            [
                TableOp::Buffer {
                    slot: 5,
                    buffer: "material".to_string(),
                    offset: 0
                },
                TableOp::Texture {
                    slot: 1,
                    texture: "brick".to_string()
                },
            ]
        );
        assert_eq!(
            ops(&function, "table@1/5"),
            [
                TableOp::Attach {
                    buffer: "material".to_string(),
                    offset: 0
                },
                TableOp::Constant {
                    slot: 0,
                    bytes: 0.25f32.to_le_bytes().to_vec()
                },
                TableOp::Texture {
                    slot: 1,
                    texture: "bumps".to_string()
                },
            ]
        );
        assert_eq!(
            commands.commands[1..],
            [Command::UseResource {
                buffer: "material".to_string(),
                usage: ResourceUsage::Read
            }]
        );
    }

    #[test]
    fn buffers_bound_into_a_table_are_made_resident() {
        let index = binding_index();
        let function = MemoryFunction::default();
        let mut commands = RecordingEncoder::default();

        let mut binder = scene(&index, &function, &mut commands);
        binder.attach_buffer(&MemoryBuffer::new("args", 64), 0).unwrap();
        binder
            .bind_buffer_at(&path("lights"), &MemoryBuffer::new("light", 8), 16)
            .unwrap();
        assert!(matches!(
            binder.bind_buffer_at(&path("color"), &MemoryBuffer::new("x", 16), 0),
            Err(BindingError::UnexpectedCategory { .. })
        ));
        drop(binder);

        assert_eq!(
            ops(&function, "table@1")[1..],
            [TableOp::Buffer {
                slot: 4,
                buffer: "light".to_string(),
                offset: 16
            }]
        );
        assert_eq!(
            commands.commands[1..],
            [Command::UseResource {
                buffer: "light".to_string(),
                usage: ResourceUsage::ReadWrite
            }]
        );
    }
}
