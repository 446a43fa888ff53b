//! Blockchain primitives subsystem.
//!
//! # Data Flow
//! ```text
//! query string
//!     → address.rs (syntax checks, no I/O)
//! strategies
//!     → abi.rs (calldata for balanceOf/decimals/symbol)
//!     → provider::rpc (eth_call)
//!     → abi.rs (decode uint / string return data)
//! ```

pub mod abi;
pub mod address;

pub use abi::AbiError;
pub use address::{parse_evm_address, parse_solana_address, InputValidationError};
