//! Business logic services (use cases) outside the turn pipeline.
//!
//! Services depend on traits (ports), never on concrete infrastructure.

pub mod identity;
pub mod keys;
