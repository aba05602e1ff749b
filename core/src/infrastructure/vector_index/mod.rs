pub mod flat_index;

pub use flat_index::FlatVectorIndex;
