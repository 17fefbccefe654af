//! PDA and instruction builders for the mixer program

pub mod instruction;
pub mod pda;
