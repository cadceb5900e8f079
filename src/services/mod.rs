pub mod extract;
pub mod fetch;
pub mod log;
pub mod scrape;
pub mod store;

pub use fetch::*;
pub use log::*;
pub use scrape::*;
pub use store::*;
