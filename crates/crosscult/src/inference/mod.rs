//! Label inference: culture/model guesses from file names and canonical
//! model names from raw strings.

mod filename;
mod model;

pub use filename::{guess_labels, Culture, FilenameGuess, ModelFamily};
pub use model::{model_family, standardize_model};
