mod callback;
mod compression;

pub use callback::{strip_callback, wrap_callback};
pub use compression::{compress_gzip, compress_zlib, decompress_gzip, decompress_zlib};
