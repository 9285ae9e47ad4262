//! Pure text transformation logic. Nothing in this tree touches the
//! filesystem; the `system` layer owns that.

pub mod escaper;
pub mod locator;
pub mod region;
pub mod rewriter;
