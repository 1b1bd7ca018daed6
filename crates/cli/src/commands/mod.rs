pub mod ident;
pub mod init;
pub mod plan;
pub mod sync;
pub mod util;

pub use ident::*;
pub use init::*;
pub use plan::*;
pub use sync::*;
pub use util::*;
