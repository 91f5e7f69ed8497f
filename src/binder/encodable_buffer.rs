use super::*;
use crate::address::resolve_byte_offset;

/// Writes plain data into a buffer bound behind a pointer member of a table.
///
/// Paths are relative to the pointed-to struct.
pub struct EncodableBufferWriter<'a, B: Backend> {
    encoding: Encoding<'a>,
    buffer: &'a B::Buffer,
    offset: usize,
}

impl<'a, B: Backend> EncodableBufferWriter<'a, B> {
    pub(super) fn new(encoding: Encoding<'a>, buffer: &'a B::Buffer, offset: usize) -> Self {
        Self {
            encoding,
            buffer,
            offset,
        }
    }

    fn locate(&self, path: &SymbolicPath, length: usize) -> Result<usize, BindingError> {
        let local = self.encoding.local_category_sequence(path)?;
        let category = destination(path, local)?;
        expect_category(path, category, "plain data", BindingCategory::is_bytes)?;

        let offset = self.offset + resolve_byte_offset(path.tokens(), &local[1..])?;
        check_buffer_length::<B>(self.buffer, offset, length)?;
        Ok(offset)
    }

    pub fn write_bytes_at(&mut self, path: &SymbolicPath, bytes: &[u8]) -> Result<(), BindingError> {
        let offset = self.locate(path, bytes.len())?;
        B::write_buffer(self.buffer, offset, bytes);
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
                let bytes = value.to_gpu_bytes();
                Ok((self.locate(element, bytes.len())?, bytes))
            })
            .collect::<Result<Vec<_>, BindingError>>()?;

        for (offset, bytes) in writes {
            B::write_buffer(self.buffer, offset, &bytes);
        }
        Ok(())
    }
}
