pub mod collect;
pub mod config;
pub mod info;
pub mod translate;

pub use collect::*;
pub use config::*;
pub use info::*;
pub use translate::*;
