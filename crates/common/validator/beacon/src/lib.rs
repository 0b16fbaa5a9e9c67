pub mod bls_to_execution_change;
pub mod domain;
pub mod exit_builder;
pub mod signer;
pub mod voluntary_exit;
