//! Track pair selection from discovered fragments.

mod disambiguator;

pub use disambiguator::{disambiguate, DisambiguateError, DisambiguateResult};
