mod async_error;
mod async_state;
mod execution_result;
mod group;
mod lens;
mod state_cell;
mod stateful_future;
mod status;
mod updater;
pub mod redux;

#[cfg(test)]
mod unit_tests;

pub use async_error::*;
pub use async_state::*;
pub use execution_result::*;
pub use group::*;
pub use lens::*;
pub use state_cell::*;
pub use stateful_future::*;
pub use status::*;
pub use updater::*;

pub trait State: Clone + Send + Sync + 'static {}
