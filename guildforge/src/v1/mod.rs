/// Guild badge model
pub mod badge;

/// Badge wire codec
pub mod codec;

/// Badge tokens and the integrity guard
pub mod token;

/// Declaration of API response structure
pub mod api;
