// Domain layer - Pure data types for the sparkline pipeline
pub mod scene;
pub mod series;
pub mod sparkline;
