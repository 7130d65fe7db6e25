//! Source image identification.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` (header only) |
//! | **Format** | content sniffing, file extension as fallback |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait, [`SourceInfo`] and [`load_source`]
//! - **Rust backend**: [`RustBackend`], the `image` crate implementation

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, SourceInfo, load_source};
pub use rust_backend::RustBackend;
