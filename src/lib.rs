pub mod address;
pub mod backend;
pub mod binder;
pub mod classifier;
pub mod encoder_group;
pub mod error;
pub mod gpu_write;
pub mod path_index;
pub mod paths;
pub mod pipeline;
pub mod reflection;
pub mod util;

#[cfg(test)]
mod test_support;

pub use binder::{RootBinder, make_root_binder};
pub use error::BindingError;
pub use gpu_write::GPUWrite;
pub use path_index::{Encoding, PathIndex};
pub use paths::{PathParseError, SymbolicPath};
pub use pipeline::*;
