pub mod enums;
pub mod object;
pub mod owner;

pub use enums::*;
pub use object::*;
pub use owner::*;
