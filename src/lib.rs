pub mod core;
pub mod session;

pub use core::config::{BittrexConfig, ConfigError};
pub use core::errors::BittrexError;
pub use core::response::{Payload, Record};
pub use session::endpoints::OrderBookType;
pub use session::{BittrexBlockingSession, BittrexSession};
