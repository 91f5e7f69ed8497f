use super::*;
use crate::address::resolve_byte_offset;
use crate::classifier::ArgumentInfo;

/// Binds a root pointing at a plain struct.
///
/// Before a buffer is attached the whole value can be copied into the slot. Once a
/// buffer is attached, members are written into it by path. The two modes exclude
/// each other.
pub struct EncodableArgumentBinder<'a, B: Backend> {
    encoding: Encoding<'a>,
    argument: ArgumentInfo,
    commands: &'a mut dyn CommandEncoder<B>,
    buffer: Option<(B::Buffer, usize)>,
    copied_bytes: bool,
}

impl<'a, B: Backend> EncodableArgumentBinder<'a, B> {
    pub fn new(
        encoding: Encoding<'a>,
        argument: ArgumentInfo,
        commands: &'a mut dyn CommandEncoder<B>,
    ) -> Self {
        Self {
            encoding,
            argument,
            commands,
            buffer: None,
            copied_bytes: false,
        }
    }

    pub fn encoded_length(&self) -> usize {
        self.argument.buffer_data_size
    }

    pub fn attach_buffer(&mut self, buffer: &B::Buffer, offset: usize) -> Result<(), BindingError> {
        if self.copied_bytes {
            return Err(BindingError::OverridesDirectBytes(self.argument.name.clone()));
        }
        if self.buffer.is_some() {
            return Err(BindingError::BufferAlreadyAttached);
        }
        check_buffer_length::<B>(buffer, offset, self.encoded_length())?;

        self.commands.set_buffer(buffer, offset, self.argument.index);
        self.buffer = Some((buffer.clone(), offset));
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BindingError> {
        if self.buffer.is_some() {
            return Err(BindingError::OverridesAttachedBuffer(
                self.argument.name.clone(),
            ));
        }

        self.commands.set_bytes(bytes, self.argument.index);
        self.copied_bytes = true;
        Ok(())
    }

    /// absolute offset in the attached buffer of the bytes at `path`
    fn locate(&self, path: &SymbolicPath, length: usize) -> Result<usize, BindingError> {
        if self.copied_bytes {
            return Err(BindingError::OverridesDirectBytes(self.argument.name.clone()));
        }
        let Some((buffer, base)) = &self.buffer else {
            return Err(BindingError::NoBackingBuffer);
        };

        let local = self.encoding.local_category_sequence(path)?;
        let category = destination(path, local)?;
        expect_category(path, category, "plain data", BindingCategory::is_bytes)?;

        let offset = base + resolve_byte_offset(path.tokens(), &local[1..])?;
        check_buffer_length::<B>(buffer, offset, length)?;
        Ok(offset)
    }

    pub fn write_bytes_at(&mut self, path: &SymbolicPath, bytes: &[u8]) -> Result<(), BindingError> {
        let offset = self.locate(path, bytes.len())?;
        if let Some((buffer, _)) = &self.buffer {
            B::write_buffer(buffer, offset, bytes);
        }
        Ok(())
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
                let bytes = value.to_gpu_bytes();
                Ok((self.locate(element, bytes.len())?, bytes))
            })
            .collect::<Result<Vec<_>, BindingError>>()?;

        if let Some((buffer, _)) = &self.buffer {
            for (offset, bytes) in writes {
                B::write_buffer(buffer, offset, &bytes);
            }
        }
        Ok(())
    }
}
