pub mod classify;
pub mod explain;
pub mod symbols;
pub mod util;

pub use classify::*;
pub use explain::*;
pub use symbols::*;
pub use util::*;
