pub mod shutdown;
pub mod slug;
pub mod types;

pub use shutdown::*;
pub use types::*;
