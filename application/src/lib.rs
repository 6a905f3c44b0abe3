pub mod saga;
pub mod service;
pub mod transfer;
