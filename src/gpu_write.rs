use glam::{IVec2, IVec3, IVec4, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec3A, Vec4};

/// A value that can be copied into shader argument memory.
///
/// Bytes are little-endian and follow the shader-side layout of the type, so
/// `Vec3A` carries the padding a `float3` has and `Vec3` matches `packed_float3`.
pub trait GPUWrite {
    fn write_gpu_bytes(&self, bytes: &mut Vec<u8>);

    fn to_gpu_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![];
        self.write_gpu_bytes(&mut bytes);
        bytes
    }
}

macro_rules! impl_gpu_write_scalar {
    ($($scalar:ty),*) => {
        $(
            impl GPUWrite for $scalar {
                fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
                    bytes.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_gpu_write_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32);

impl GPUWrite for bool {
    fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.push(u8::from(*self));
    }
}

impl<T: GPUWrite> GPUWrite for [T] {
    fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
        for element in self {
            element.write_gpu_bytes(bytes);
        }
    }
}

impl<T: GPUWrite, const N: usize> GPUWrite for [T; N] {
    fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
        self.as_slice().write_gpu_bytes(bytes);
    }
}

macro_rules! impl_gpu_write_vector {
    ($($vector:ty),*) => {
        $(
            impl GPUWrite for $vector {
                fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
                    self.to_array().write_gpu_bytes(bytes);
                }
            }
        )*
    };
}

impl_gpu_write_vector!(Vec2, Vec3, Vec4, UVec2, UVec3, UVec4, IVec2, IVec3, IVec4);

impl GPUWrite for Vec3A {
    fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
        self.to_array().write_gpu_bytes(bytes);
        bytes.extend_from_slice(&[0; 4]);
    }
}

impl GPUWrite for Mat4 {
    fn write_gpu_bytes(&self, bytes: &mut Vec<u8>) {
        self.to_cols_array().write_gpu_bytes(bytes);
    }
}
