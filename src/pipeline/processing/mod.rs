// Pipeline processing: coercion, missing-value policy, text cleanup,
// arithmetic diagnostics and deductive imputation

pub mod coerce;
pub mod imputation;
pub mod missing;
pub mod normalize;
pub mod quality_gate;

pub use coerce::{coerce_all, CoercionStats};
pub use imputation::{impute_items, ImputationReport, PriceItemMap, PriceKey};
pub use missing::{resolve_missing, MissingValueStats};
pub use normalize::{normalize_text, NormalizationStats};
pub use quality_gate::{ArithmeticValidator, MathCheckReport, QualityGate, QualityGateConfig};
