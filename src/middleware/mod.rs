pub mod cors;
pub mod security_headers;

pub use cors::*;
pub use security_headers::*;
