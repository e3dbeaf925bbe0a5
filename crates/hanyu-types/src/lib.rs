pub mod messages;
pub mod types;

pub use messages::{ErrorKind, Request, Response};
pub use types::*;
