pub mod model;
pub mod util;

mod core_error;

pub use core_error::CoreError;
