//! Injectable seam for the optional masked-language-model candidate
//! picker.
//!
//! The engine itself never constructs or consults a model; the host
//! builds a [`RerankerService`], loads a model into it when the feature
//! is enabled, and asks it to pick among ambiguous candidates. Hosts
//! that do not re-rank never construct the service.

use tracing::debug;

/// What an external statistical model must provide: given the text
/// preceding the match window and the candidate surfaces, the index of
/// the most plausible candidate (`None` when the model abstains).
pub trait MaskedLanguageModel: Send {
    fn pick(&self, context: &str, candidates: &[String]) -> Option<usize>;
}

/// Owns the model lifecycle so the host can load and unload it
/// explicitly (models are large; sessions that never convert should
/// not pay for one).
#[derive(Default)]
pub struct RerankerService {
    model: Option<Box<dyn MaskedLanguageModel>>,
}

impl RerankerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, model: Box<dyn MaskedLanguageModel>) {
        debug!("reranker model loaded");
        self.model = Some(model);
    }

    pub fn unload(&mut self) {
        debug!("reranker model unloaded");
        self.model = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Pick a candidate index, falling back to `current` when no model
    /// is loaded, the model abstains, or it returns an out-of-range
    /// index.
    pub fn pick(&self, context: &str, candidates: &[String], current: usize) -> usize {
        let Some(model) = &self.model else {
            return current;
        };
        match model.pick(context, candidates) {
            Some(index) if index < candidates.len() => index,
            _ => current,
        }
    }
}
