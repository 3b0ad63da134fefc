pub mod app;

pub use app::{body_bytes, get, make_test_app};
