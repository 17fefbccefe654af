//! PDA and instruction builders for the bridge program

pub mod instruction;
pub mod pda;
