pub mod outcome;
pub mod request;
pub mod section;
pub use outcome::{GenerationOutcome, SectionResult, Variation};
pub use request::{Difficulty, DocumentFlavor, GenerationMode, GenerationRequest};
pub use section::SectionDefinition;
