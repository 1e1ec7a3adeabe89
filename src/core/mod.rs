pub mod compress;
pub mod crypto;
pub mod file;
pub mod util;

pub use compress::*;
pub use crypto::*;
pub use file::*;
pub use util::*;

pub type Result<T> = std::result::Result<T, crate::error::CoreError>;
