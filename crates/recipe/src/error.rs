use thiserror::Error;

pub type RecipeResult<T> = Result<T, RecipeError>;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("At least {required} recipes are needed, got {actual}")]
    NotEnoughRecipes { required: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
