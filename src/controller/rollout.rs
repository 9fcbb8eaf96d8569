pub mod condition;
pub mod params;
pub mod status;

pub use condition::*;
pub use params::*;
pub use status::*;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Tests can use unwrap/expect for brevity
#[path = "rollout_test.rs"]
mod tests;
