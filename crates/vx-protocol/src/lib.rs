pub mod classification;
pub mod commands;
pub mod decision;
pub mod model;

pub use classification::*;
pub use commands::*;
pub use decision::*;
pub use model::*;
