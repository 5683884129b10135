#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use strand_grid as grid;

#[doc(inline)]
pub use strand_flow as flow;

#[doc(inline)]
pub use strand_track as track;

#[doc(inline)]
pub use strand_attn as attn;
