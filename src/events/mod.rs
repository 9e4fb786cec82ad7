//! Events raised by the frame scheduler.
//!
//! - [`collision`] – contact pair ids, per-frame contact sets and the
//!   begin/end diff that drives collision listeners
pub mod collision;
