pub mod fs;
pub mod stream;
