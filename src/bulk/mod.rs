pub mod address;
pub mod collector;
pub mod executor;
pub mod model;
pub mod scope;
pub mod session;
pub mod stream;
