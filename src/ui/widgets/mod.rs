pub mod bars;
pub mod halfblock;

pub use bars::bar_text;
pub use halfblock::HalfBlockImage;
