pub mod claims;
pub mod core;
pub mod error;
pub mod grid;
pub mod hover;
pub mod pool;
pub mod render;
pub mod runtime;
pub mod spatial;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use error::{BetCubeError, GridError};

pub type Result<T> = std::result::Result<T, error_stack::Report<BetCubeError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::claims::*;
    pub use crate::core::*;
    pub use crate::grid::*;
    pub use crate::hover::*;
    pub use crate::pool::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::spatial::*;
}
