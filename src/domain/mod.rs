// Domain layer - Water chemistry models and the pure forecasting/scoring rules
pub mod error;
pub mod forecast;
pub mod parameter;
pub mod prediction;
pub mod reading;
pub mod recommendation;
pub mod risk;
pub mod site;
pub mod site_model;
pub mod wqi;
