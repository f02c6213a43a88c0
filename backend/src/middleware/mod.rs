pub mod logging;
pub mod panic;
pub mod request_id;

pub use logging::log_requests;
pub use panic::{catch_panic, install_panic_hook};
pub use request_id::{REQUEST_ID_HEADER, RequestId, assign_request_id};
