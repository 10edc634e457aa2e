pub use ::tether_core::*;
pub use ::tether_macros::Record;
