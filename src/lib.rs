pub mod config;
pub mod models;
pub mod parser;
pub mod processing;
pub mod utils;
pub mod validation;

pub use config::ParserConfig;
pub use models::{DocumentFormat, MrzField, MrzResult, Sex};
pub use parser::MrzParser;
pub use utils::MrzError;
