pub use self::{cell::*, field::*, piece::*, point::*};

pub(crate) mod cell;
pub(crate) mod field;
pub(crate) mod piece;
pub(crate) mod point;
