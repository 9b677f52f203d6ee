pub mod direction_detect;
pub mod extractor;
pub mod fuzzy;
pub mod guard;
pub mod line_detect;
pub mod ner;
pub mod station_detect;

#[cfg(test)]
mod test_support;

pub use extractor::Extractor;
pub use ner::{HeuristicNerTagger, NerTagger, Span};
