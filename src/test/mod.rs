mod error;
mod status;
mod utils;

pub use utils::test_utils;
