pub mod ascii;
pub mod sjis;

pub use ascii::{ascii_int, ascii_real};
pub use sjis::sjis_text;
