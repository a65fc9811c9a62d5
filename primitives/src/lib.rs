#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod assets;
pub mod bond;
pub mod ecosystem;
pub mod math;
pub mod reserve;
pub mod strategies;
pub mod traits;

pub use assets::*;
pub use bond::*;
pub use ecosystem::*;
pub use reserve::*;
pub use strategies::*;
pub use traits::*;
