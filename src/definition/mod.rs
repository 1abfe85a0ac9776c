pub mod button;
pub mod conditional;
pub mod conversion;
pub mod definition;
mod flags;
pub mod node;

pub use button::*;
pub use conditional::*;
pub use conversion::*;
pub use definition::*;
pub use node::*;
