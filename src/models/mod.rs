pub mod aggregate;
pub mod filter;
pub mod record;

pub use aggregate::*;
pub use filter::*;
pub use record::*;
