// Domain layer - Editor models and rules

pub mod errors;
pub mod model;
pub mod rules;
