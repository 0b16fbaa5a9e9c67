pub mod attestation;
pub mod block;
pub mod committee;
pub mod config;
pub mod duties;
pub mod endpoints;
pub mod error;
pub mod finality;
pub mod id;
pub mod responses;
pub mod sync;
pub mod validator;
