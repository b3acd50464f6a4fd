pub mod config;
pub mod load_style;

pub use config::{LoaderConfig, SessionTuning};
pub use load_style::LoadStyle;
