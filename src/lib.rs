//! nutricalc - Clinical nutrition calculation engine
//!
//! nutricalc transforms a patient's anthropometric and laboratory inputs
//! into a fully resolved assessment report through a deterministic pipeline:
//! energy expenditure → calorie target → macro allocation, alongside body
//! composition, lab interpretation, exchange planning, and the sodium
//! budget.
//!
//! ## Modules
//!
//! - **Calculation engine**: the pure-function pipeline from input record to
//!   assessment report
//! - **Export surface**: markdown plan/note rendering and FHIR-style
//!   interoperability records consuming the report

pub mod body;
pub mod catalog;
pub mod energy;
pub mod error;
pub mod exchanges;
pub mod export;
pub mod intake;
pub mod labs;
pub mod macronutrients;
pub mod pipeline;
pub mod sodium;
pub mod types;

pub use catalog::ExchangeCatalog;
pub use error::CalcError;
pub use intake::AssessmentInput;
pub use pipeline::{assess, NutritionEngine};
pub use types::AssessmentReport;

/// Engine version embedded in every report
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report provenance
pub const PRODUCER_NAME: &str = "nutricalc";
