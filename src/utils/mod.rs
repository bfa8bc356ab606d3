pub mod errors;
pub mod jwt;
pub mod paging;
pub mod serde;
pub mod strings;
