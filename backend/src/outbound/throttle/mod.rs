//! Request throttling adapters.

mod fixed_window;

pub use fixed_window::FixedWindowThrottle;
