//! # Procura Core Domain Models
//!
//! Core domain models for the Procura supplier performance analysis system.
//! All models implement serialization/deserialization with serde.
//!
//! ## Key Models
//!
//! - **Analysis**: a user-owned batch of imported supplier records plus its
//!   run status and the `fallback` flag for locally scored runs
//! - **SupplierRecord**: one imported order row with its evaluation fields
//! - **Category**: the discretized EXCELLENT..CRITICAL performance tier
//! - **GeneratedMessage**: an outbound communication draft for one of the
//!   three audiences (suppliers, buyers, management)
//!
//! The status and category enums carry explicit string forms so the
//! persistence layer stores readable values instead of serde artifacts.

pub mod analysis;
pub mod message;
pub mod supplier;

pub use analysis::{Analysis, AnalysisStatus, NewAnalysis};
pub use message::{GeneratedMessage, MessageType, NewMessage};
pub use supplier::{Category, NewSupplier, SupplierRecord};
