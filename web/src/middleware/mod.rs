pub mod access_gate;
pub mod request_id;

pub use access_gate::*;
pub use request_id::*;
