pub mod annotate;
pub mod predict;
