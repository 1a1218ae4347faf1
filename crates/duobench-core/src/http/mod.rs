pub mod request;

pub use request::{build_client, send_request};
