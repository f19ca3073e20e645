/*!
 * Document translation using machine translation providers.
 *
 * The pipeline is split into small submodules:
 *
 * - `segmenter`: Splits text into fenced code and translatable prose
 * - `chunker`: Packs prose into provider-sized chunks along paragraph breaks
 * - `backoff`: Retry delay policies
 * - `fallback`: Ordered provider chain with per-provider retry
 * - `glossary`: Post-translation terminology replacement
 * - `json_walker`: Eligibility rules and rebuilding for JSON documents
 * - `core`: Context and per-document translator tying it all together
 */

// Re-export main types for easier usage
pub use self::backoff::{BackoffPolicy, Growth};
pub use self::core::{DocumentStats, DocumentTranslator, TranslationContext};
pub use self::fallback::{AttemptOutcome, FallbackChain, TranslatedChunk};
pub use self::glossary::{Glossary, GlossaryEntry};
pub use self::json_walker::{InclusionMode, JsonPolicy};
pub use self::segmenter::{Segment, SegmentKind};

// Submodules
pub mod backoff;
pub mod chunker;
pub mod core;
pub mod fallback;
pub mod glossary;
pub mod json_walker;
pub mod segmenter;
