pub mod dict;
pub mod inflection;
pub(crate) mod numeric;
pub mod reranker;
pub mod settings;
pub mod unicode;

pub use dict::ConversionDictionary;
pub use inflection::OkuriMatch;
pub use reranker::{MaskedLanguageModel, RerankerService};
pub use settings::EngineConfig;
