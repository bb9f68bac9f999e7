#[cfg(feature = "backend-mock")]
pub mod mock;
