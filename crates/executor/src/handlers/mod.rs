//! Command handlers.
//!
//! | Module | Commands | Primitive |
//! |--------|----------|-----------|
//! | `contract` | 6 | ContractStoreExt |

pub mod contract;
