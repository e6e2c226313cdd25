pub mod aggregator;
pub mod calculator;
pub mod classifier;
pub mod optimizer;
pub mod parser;
pub mod scorer;
pub mod selection;
pub mod validator;

pub use aggregator::sum_column_values;
pub use calculator::TaxCalculator;
pub use classifier::DocumentClassifier;
pub use optimizer::InvoiceOptimizer;
pub use parser::parse_numeric_value;
pub use scorer::EfficiencyScorer;
pub use selection::{ExactSubsetSelector, GreedySelector, InvoiceSelector, SelectionStrategy};
pub use validator::InvoiceValidator;
