pub mod construction;
pub mod model;
pub mod serialization;

pub use construction::MatrixLoader;
pub use model::{Matrix, INFINITE_ENTRY};
