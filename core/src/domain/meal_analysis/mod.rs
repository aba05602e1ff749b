pub mod entities;
pub mod ports;
pub mod schema;
pub mod services;
pub mod staging;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use staging::StagedImage;
pub use value_objects::*;
