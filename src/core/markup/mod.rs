pub mod heuristics;
pub mod parser;
pub mod transformer;

pub use transformer::MarkupTransformer;
