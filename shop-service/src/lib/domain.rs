pub mod errors;
pub mod identity;
pub mod product;
pub mod review;
pub mod user;
