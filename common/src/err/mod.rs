pub mod loader_error;

pub use loader_error::LoaderError;

/// 共通 Result
pub type LResult<T> = Result<T, LoaderError>;
