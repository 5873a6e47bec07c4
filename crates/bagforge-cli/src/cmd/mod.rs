pub mod build_matrix;
pub mod detect;
pub mod validate;
