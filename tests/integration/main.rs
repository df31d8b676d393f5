//! Integration tests for the gym schedule service.
//!
//! `scenario` drives the public router against the in-memory store.
//! `mongo` needs a reachable MongoDB:
//! Run with: MONGODB_URI=mongodb://localhost:27017 cargo test --test integration -- --ignored

mod mongo;
mod scenario;
