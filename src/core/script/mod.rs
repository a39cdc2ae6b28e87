pub mod collector;
pub mod imports;
pub mod parser;
pub mod transformer;

pub use transformer::ScriptTransformer;
