//! Integration tests driving the public facade

mod config_test;
mod global_test;
mod logger_test;
