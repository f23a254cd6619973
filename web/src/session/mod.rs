//! Cookie-backed session handling: token codec, cookie store, and the axum
//! extractors handlers use to read the current session.

pub mod codec;
pub mod extract;
pub mod store;

pub use codec::*;
pub use extract::*;
pub use store::*;
