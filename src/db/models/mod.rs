pub mod clip;
pub mod eval_row;

pub use clip::Clip;
pub use eval_row::EvalRow;
