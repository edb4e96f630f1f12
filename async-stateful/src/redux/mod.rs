//! Action creators, reducers and thunks driving [`AsyncState`](crate::AsyncState)
//! fields of a dispatch-based store.

mod action;
mod reducer;
mod store;
mod thunk;

pub use action::*;
pub use reducer::*;
pub use store::*;
pub use thunk::*;
