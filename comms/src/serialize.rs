use std::io;

/// Types that can be written as the body of a framed message.
pub trait Serialize<'a> {
    /// Writes the owned part of `self` into `buf`.
    ///
    /// # Returns
    /// A trailing slice that must be sent right after `buf` without copying it,
    /// or an io error if `self` couldn't be encoded.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> io::Result<Option<&'a [u8]>>;
}
