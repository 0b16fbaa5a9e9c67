pub mod bls_to_execution_change;
pub mod checkpoint;
pub mod constants;
pub mod fork;
pub mod fork_data;
pub mod genesis;
pub mod misc;
pub mod signing_data;
pub mod validator;
pub mod voluntary_exit;
