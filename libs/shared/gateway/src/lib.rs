pub mod practice;

pub use practice::{GatewayError, PracticeClient};
