//! End-to-end tests: the full router over an in-memory bus with a fake
//! user persistence service on the other side.

mod auth_test;
mod bridge_test;
mod helpers;
