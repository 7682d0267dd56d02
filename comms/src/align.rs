/// Element types a receive buffer can be made of.
///
/// Their alignment is at least 8 bytes, so `f64` payloads can be borrowed
/// straight out of the buffer after the message header.
pub trait Align8: bytemuck::Pod {}

impl Align8 for u64 {}
impl Align8 for i64 {}
impl Align8 for u128 {}
impl Align8 for i128 {}
impl Align8 for f64 {}
