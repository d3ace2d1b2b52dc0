//! Query generation and answer synthesis

mod generator;
mod synthesizer;

pub use generator::{GenerationRequest, QueryGenerator, strip_code_fences};
pub use synthesizer::ResponseSynthesizer;

#[cfg(test)]
pub use generator::mock::MockQueryGenerator;
#[cfg(test)]
pub use synthesizer::mock::MockResponseSynthesizer;
