//! Transport layer module.

pub mod mock;
pub mod traits;

pub use mock::MockDevice;
pub use traits::{PhonebookDevice, TransportError};
