//! Root binders: one per classified root argument, selected once and dispatched
//! by `match`.

use log::*;

use crate::backend::{Backend, CommandEncoder, LodClamp};
use crate::classifier::BindingCategory;
use crate::error::BindingError;
use crate::gpu_write::GPUWrite;
use crate::path_index::Encoding;
use crate::paths::SymbolicPath;

mod argument;
pub use argument::*;

mod encodable_argument;
pub use encodable_argument::*;

mod encodable_buffer;
pub use encodable_buffer::*;

mod resource;
pub use resource::*;

mod table;
pub use table::*;

pub enum RootBinder<'a, B: Backend> {
    Argument(ArgumentBinder<'a, B>),
    EncodableArgument(EncodableArgumentBinder<'a, B>),
    Texture(TextureBinder<'a, B>),
    Sampler(SamplerBinder<'a, B>),
    Table(TableBinder<'a, B>),
}

/// Picks the binder for the root an encoding is anchored at.
pub fn make_root_binder<'a, B: Backend>(
    encoding: Encoding<'a>,
    function: &B::Function,
    commands: &'a mut dyn CommandEncoder<B>,
) -> Result<RootBinder<'a, B>, BindingError> {
    let category = encoding.category();
    debug!("binding {category}");

    let binder = match category {
        BindingCategory::Argument(argument) => {
            RootBinder::Argument(ArgumentBinder::new(argument.clone(), commands))
        }
        BindingCategory::EncodableArgument(argument, _) => {
            reject_buffer_array(argument.array_length, "encodable argument")?;
            RootBinder::EncodableArgument(EncodableArgumentBinder::new(
                encoding,
                argument.clone(),
                commands,
            ))
        }
        BindingCategory::TextureArgument(argument) => {
            RootBinder::Texture(TextureBinder::new(encoding, argument.clone(), commands))
        }
        BindingCategory::SamplerArgument(argument) => {
            RootBinder::Sampler(SamplerBinder::new(encoding, argument.clone(), commands))
        }
        BindingCategory::ArgumentContainingIndirectionTable(argument, pointer) => {
            reject_buffer_array(argument.array_length, "argument table")?;
            let encoder = B::make_table_encoder(function, argument.index, pointer);
            RootBinder::Table(TableBinder::new(
                encoding,
                argument.index,
                encoder,
                None,
                commands,
            ))
        }
        category => {
            return Err(BindingError::UnexpectedCategory {
                path: encoding_path(&encoding),
                expected: "root argument",
                found: category.to_string(),
            });
        }
    };

    Ok(binder)
}

fn reject_buffer_array(array_length: usize, binder: &'static str) -> Result<(), BindingError> {
    if array_length > 1 {
        return Err(BindingError::UnsupportedOperation {
            operation: "binding arrays of buffer arguments",
            binder,
        });
    }

    Ok(())
}

fn encoding_path(encoding: &Encoding<'_>) -> String {
    crate::paths::describe_keys(encoding.prefix())
}

impl<'a, B: Backend> RootBinder<'a, B> {
    fn name(&self) -> &'static str {
        match self {
            RootBinder::Argument(_) => "argument",
            RootBinder::EncodableArgument(_) => "encodable argument",
            RootBinder::Texture(_) => "texture",
            RootBinder::Sampler(_) => "sampler",
            RootBinder::Table(_) => "argument table",
        }
    }

    fn unsupported(&self, operation: &'static str) -> BindingError {
        BindingError::UnsupportedOperation {
            operation,
            binder: self.name(),
        }
    }

    /// bytes a buffer attached to this root must provide
    pub fn encoded_length(&self) -> Result<usize, BindingError> {
        match self {
            RootBinder::EncodableArgument(binder) => Ok(binder.encoded_length()),
            RootBinder::Table(binder) => Ok(binder.encoded_length()),
            other => Err(other.unsupported("encoded_length")),
        }
    }

    /// Attaches the buffer that backs an encodable argument or an argument table.
    pub fn attach_buffer(&mut self, buffer: &B::Buffer, offset: usize) -> Result<(), BindingError> {
        match self {
            RootBinder::EncodableArgument(binder) => binder.attach_buffer(buffer, offset),
            RootBinder::Table(binder) => binder.attach_buffer(buffer, offset),
            other => Err(other.unsupported("attach_buffer")),
        }
    }

    pub fn bind_buffer(&mut self, buffer: &B::Buffer, offset: usize) -> Result<(), BindingError> {
        match self {
            RootBinder::Argument(binder) => binder.bind_buffer(buffer, offset),
            other => Err(other.unsupported("bind_buffer")),
        }
    }

    /// copies bytes straight into the root's slot
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BindingError> {
        match self {
            RootBinder::Argument(binder) => binder.write_bytes(bytes),
            RootBinder::EncodableArgument(binder) => binder.write_bytes(bytes),
            other => Err(other.unsupported("write_bytes")),
        }
    }

    pub fn write_value<T: GPUWrite + ?Sized>(&mut self, value: &T) -> Result<(), BindingError> {
        self.write_bytes(&value.to_gpu_bytes())
    }

    pub fn write_bytes_at(&mut self, path: &SymbolicPath, bytes: &[u8]) -> Result<(), BindingError> {
        match self {
            RootBinder::EncodableArgument(binder) => binder.write_bytes_at(path, bytes),
            RootBinder::Table(binder) => binder.write_bytes_at(path, bytes),
            other => Err(other.unsupported("write_bytes_at")),
        }
    }

    pub fn write_value_at<T: GPUWrite + ?Sized>(
        &mut self,
        path: &SymbolicPath,
        value: &T,
    ) -> Result<(), BindingError> {
        self.write_bytes_at(path, &value.to_gpu_bytes())
    }

    /// Writes consecutive array elements, starting at the path's trailing index or at 0.
    pub fn write_values_at<T: GPUWrite>(
        &mut self,
        path: &SymbolicPath,
        values: &[T],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::EncodableArgument(binder) => binder.write_values_at(path, values),
            RootBinder::Table(binder) => binder.write_values_at(path, values),
            other => Err(other.unsupported("write_values_at")),
        }
    }

    pub fn bind_buffer_at(
        &mut self,
        path: &SymbolicPath,
        buffer: &B::Buffer,
        offset: usize,
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Table(binder) => binder.bind_buffer_at(path, buffer, offset),
            other => Err(other.unsupported("bind_buffer_at")),
        }
    }

    pub fn bind_buffers_at(
        &mut self,
        path: &SymbolicPath,
        buffers: &[B::Buffer],
        offsets: &[usize],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Table(binder) => binder.bind_buffers_at(path, buffers, offsets),
            other => Err(other.unsupported("bind_buffers_at")),
        }
    }

    /// Binds a buffer to a pointer-to-struct member and fills in its contents.
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
        match self {
            RootBinder::Table(binder) => {
                binder.bind_encodable_buffer_at(path, buffer, offset, configure)
            }
            other => Err(other.unsupported("bind_encodable_buffer_at")),
        }
    }

    pub fn bind_texture(&mut self, texture: &B::Texture) -> Result<(), BindingError> {
        match self {
            RootBinder::Texture(binder) => binder.bind_texture(texture),
            other => Err(other.unsupported("bind_texture")),
        }
    }

    pub fn bind_textures(&mut self, textures: &[B::Texture]) -> Result<(), BindingError> {
        match self {
            RootBinder::Texture(binder) => binder.bind_textures(textures),
            other => Err(other.unsupported("bind_textures")),
        }
    }

    pub fn bind_texture_at(
        &mut self,
        path: &SymbolicPath,
        texture: &B::Texture,
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Texture(binder) => binder.bind_texture_at(path, texture),
            RootBinder::Table(binder) => binder.bind_texture_at(path, texture),
            other => Err(other.unsupported("bind_texture_at")),
        }
    }

    pub fn bind_textures_at(
        &mut self,
        path: &SymbolicPath,
        textures: &[B::Texture],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Texture(binder) => binder.bind_textures_at(path, textures),
            RootBinder::Table(binder) => binder.bind_textures_at(path, textures),
            other => Err(other.unsupported("bind_textures_at")),
        }
    }

    pub fn bind_sampler(&mut self, sampler: &B::Sampler) -> Result<(), BindingError> {
        match self {
            RootBinder::Sampler(binder) => binder.bind_sampler(sampler, None),
            other => Err(other.unsupported("bind_sampler")),
        }
    }

    pub fn bind_sampler_with_lod(
        &mut self,
        sampler: &B::Sampler,
        lod_clamp: LodClamp,
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Sampler(binder) => binder.bind_sampler(sampler, Some(lod_clamp)),
            other => Err(other.unsupported("bind_sampler_with_lod")),
        }
    }

    pub fn bind_samplers(&mut self, samplers: &[B::Sampler]) -> Result<(), BindingError> {
        match self {
            RootBinder::Sampler(binder) => binder.bind_samplers(samplers, None),
            other => Err(other.unsupported("bind_samplers")),
        }
    }

    pub fn bind_samplers_with_lod(
        &mut self,
        samplers: &[B::Sampler],
        lod_clamps: &[LodClamp],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Sampler(binder) => binder.bind_samplers(samplers, Some(lod_clamps)),
            other => Err(other.unsupported("bind_samplers_with_lod")),
        }
    }

    pub fn bind_sampler_at(
        &mut self,
        path: &SymbolicPath,
        sampler: &B::Sampler,
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Sampler(binder) => binder.bind_sampler_at(path, sampler),
            RootBinder::Table(binder) => binder.bind_sampler_at(path, sampler),
            other => Err(other.unsupported("bind_sampler_at")),
        }
    }

    pub fn bind_samplers_at(
        &mut self,
        path: &SymbolicPath,
        samplers: &[B::Sampler],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Sampler(binder) => binder.bind_samplers_at(path, samplers),
            RootBinder::Table(binder) => binder.bind_samplers_at(path, samplers),
            other => Err(other.unsupported("bind_samplers_at")),
        }
    }

    pub fn bind_render_pipeline_at(
        &mut self,
        path: &SymbolicPath,
        pipeline: &B::RenderPipeline,
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Table(binder) => binder.bind_render_pipeline_at(path, pipeline),
            other => Err(other.unsupported("bind_render_pipeline_at")),
        }
    }

    pub fn bind_render_pipelines_at(
        &mut self,
        path: &SymbolicPath,
        pipelines: &[B::RenderPipeline],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Table(binder) => binder.bind_render_pipelines_at(path, pipelines),
            other => Err(other.unsupported("bind_render_pipelines_at")),
        }
    }

    pub fn bind_indirect_command_buffer_at(
        &mut self,
        path: &SymbolicPath,
        buffer: &B::IndirectCommandBuffer,
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Table(binder) => binder.bind_indirect_command_buffer_at(path, buffer),
            other => Err(other.unsupported("bind_indirect_command_buffer_at")),
        }
    }

    pub fn bind_indirect_command_buffers_at(
        &mut self,
        path: &SymbolicPath,
        buffers: &[B::IndirectCommandBuffer],
    ) -> Result<(), BindingError> {
        match self {
            RootBinder::Table(binder) => binder.bind_indirect_command_buffers_at(path, buffers),
            other => Err(other.unsupported("bind_indirect_command_buffers_at")),
        }
    }

    pub fn set_threadgroup_memory_length(&mut self, length: usize) -> Result<(), BindingError> {
        match self {
            RootBinder::Argument(binder) => binder.set_threadgroup_memory_length(length),
            other => Err(other.unsupported("set_threadgroup_memory_length")),
        }
    }

    /// Opens the nested table at `path` for binding.
    pub fn child_table(&mut self, path: &SymbolicPath) -> Result<TableBinder<'_, B>, BindingError> {
        match self {
            RootBinder::Table(binder) => binder.child_table(path),
            other => Err(other.unsupported("child_table")),
        }
    }
}

/// The destination category of a local sequence, which must not lie behind a
/// further buffer or table boundary.
fn destination<'s>(
    path: &SymbolicPath,
    local: &'s [BindingCategory],
) -> Result<&'s BindingCategory, BindingError> {
    let Some((last, before)) = local.split_last() else {
        return Err(BindingError::UnknownPath(path.to_string()));
    };
    if before.iter().skip(1).any(BindingCategory::is_boundary) {
        return Err(BindingError::CrossesBoundary(path.to_string()));
    }

    Ok(last)
}

fn expect_category(
    path: &SymbolicPath,
    category: &BindingCategory,
    expected: &'static str,
    is_expected: impl Fn(&BindingCategory) -> bool,
) -> Result<(), BindingError> {
    if !is_expected(category) {
        return Err(BindingError::UnexpectedCategory {
            path: path.to_string(),
            expected,
            found: category.to_string(),
        });
    }

    Ok(())
}

fn check_range(start: usize, count: usize, length: usize) -> Result<(), BindingError> {
    if start.checked_add(count).is_none_or(|end| end > length) {
        return Err(BindingError::ArrayOutOfBounds {
            start,
            count,
            length,
        });
    }

    Ok(())
}

fn check_lengths(expected: usize, found: usize) -> Result<(), BindingError> {
    if expected != found {
        return Err(BindingError::LengthMismatch { expected, found });
    }

    Ok(())
}

/// `buffer` must hold `required` bytes past `offset`
fn check_buffer_length<B: Backend>(
    buffer: &B::Buffer,
    offset: usize,
    required: usize,
) -> Result<(), BindingError> {
    let available = B::buffer_length(buffer);
    match offset.checked_add(required) {
        Some(end) if end <= available => Ok(()),
        end => Err(BindingError::BufferTooShort {
            required: end.unwrap_or(usize::MAX),
            available,
        }),
    }
}

/// element paths for consecutive values written from `path`
fn element_paths(path: &SymbolicPath, count: usize) -> Vec<SymbolicPath> {
    let (base, start) = path.split_trailing_index();
    let start = start.unwrap_or(0);

    // stops at usize::MAX, whose element never passes a bounds check
    (0..count)
        .map_while(|i| start.checked_add(i))
        .map(|index| match &base {
            Some(base) => base.clone().index(index),
            None => SymbolicPath::indexed(index),
        })
        .collect()
}
