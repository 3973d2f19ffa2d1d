pub mod build;
pub mod cache;
pub mod inspect;
pub mod proxy;
pub mod roots;
