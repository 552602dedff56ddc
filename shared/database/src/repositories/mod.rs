pub mod analysis;
pub mod message;
pub mod supplier;

pub use analysis::{AnalysisRepository, AnalysisStats};
pub use message::MessageRepository;
pub use supplier::{SupplierRepository, SupplierStats};
