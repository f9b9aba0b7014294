//! Transformations applied to the merged table before reporting.

mod preprocess;

pub use preprocess::{
    PreprocessSummary, Preprocessor, CULTURE_CODE_COLUMN, MODEL_STANDARDIZED_COLUMN,
    NUMERIC_COLUMNS,
};
