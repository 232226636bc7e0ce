pub mod format;
pub mod position_math;
pub mod tick_math;
