use std::{borrow::Cow, io};

use crate::{
    Deserialize, Serialize,
    specs::{partial::PartialResultSpec, worker::WorkerSpec},
};

// 8 bytes so the numbers of a `Values` payload stay 8-byte aligned.
type Header = u64;
const HEADER_SIZE: usize = size_of::<Header>();

const ERR: Header = 0;
const CONTROL: Header = 1;
const VALUES: Header = 2;

/// The payload data for the `Data` variant of the `Msg` enum.
#[derive(Debug, PartialEq)]
pub enum Payload<'a> {
    Values(&'a [f64]),
}

/// The command for the `Control` variant of the `Msg` enum.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    CreateWorker(WorkerSpec),
    PartialResult(PartialResultSpec),
    Disconnect,
}

/// The application layer message for the entire system.
#[derive(Debug, PartialEq)]
pub enum Msg<'a> {
    Control(Command),
    Data(Payload<'a>),
    Err(Cow<'a, str>),
}

impl Msg<'_> {
    /// A short name of the message kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Control(Command::CreateWorker(_)) => "create_worker",
            Msg::Control(Command::PartialResult(_)) => "partial_result",
            Msg::Control(Command::Disconnect) => "disconnect",
            Msg::Data(Payload::Values(_)) => "values",
            Msg::Err(_) => "err",
        }
    }

    fn buf_is_too_small<T>(size: usize) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("The given buffer is too small {size}, must at least be {HEADER_SIZE} bytes"),
        ))
    }

    fn invalid_kind<T>(kind: Header) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received an invalid kind header {kind}"),
        ))
    }
}

impl<'a> Serialize<'a> for Msg<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> io::Result<Option<&'a [u8]>> {
        match self {
            Msg::Err(e) => {
                buf.extend_from_slice(&ERR.to_be_bytes());
                Ok(Some(e.as_bytes()))
            }
            Msg::Control(cmd) => {
                buf.extend_from_slice(&CONTROL.to_be_bytes());
                serde_json::to_writer(buf, cmd)?;
                Ok(None)
            }
            Msg::Data(Payload::Values(values)) => {
                buf.extend_from_slice(&VALUES.to_be_bytes());
                Ok(Some(bytemuck::cast_slice(values)))
            }
        }
    }
}

impl<'a> Deserialize<'a> for Msg<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Self::buf_is_too_small(buf.len());
        }

        let (kind_buf, rest) = buf.split_at(HEADER_SIZE);
        let mut kind = [0; HEADER_SIZE];
        kind.copy_from_slice(kind_buf);

        match Header::from_be_bytes(kind) {
            ERR => {
                let string = std::str::from_utf8(rest)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

                Ok(Self::Err(Cow::Borrowed(string)))
            }
            CONTROL => {
                let cmd = serde_json::from_slice(rest)?;
                Ok(Self::Control(cmd))
            }
            VALUES => {
                let values = bytemuck::try_cast_slice(rest).map_err(|err| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("malformed values payload: {err}"),
                    )
                })?;

                Ok(Self::Data(Payload::Values(values)))
            }
            kind => Self::invalid_kind(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use regression_core::PartialResultId;

    use super::*;
    use crate::specs::training::MethodSpec;

    /// Serializes `msg` into an 8-byte aligned buffer the way the receiver lays it out.
    fn aligned_bytes(msg: &Msg) -> (Vec<u64>, usize) {
        let mut buf = Vec::new();
        let tail = msg.serialize(&mut buf).unwrap();
        buf.extend_from_slice(tail.unwrap_or_default());

        let mut aligned = vec![0u64; buf.len().div_ceil(8)];
        bytemuck::cast_slice_mut::<u64, u8>(&mut aligned)[..buf.len()].copy_from_slice(&buf);
        (aligned, buf.len())
    }

    #[test]
    fn values_are_sent_as_a_zero_copy_tail() {
        let values = [1.0, -2.5, 3.25];
        let msg = Msg::Data(Payload::Values(&values));

        let mut buf = Vec::new();
        let tail = msg.serialize(&mut buf).unwrap().unwrap();

        assert_eq!(buf, VALUES.to_be_bytes());
        assert_eq!(tail.len(), values.len() * 8);

        let (aligned, len) = aligned_bytes(&msg);
        let bytes: &[u8] = bytemuck::cast_slice(&aligned);
        assert_eq!(Msg::deserialize(&bytes[..len]).unwrap(), msg);
    }

    #[test]
    fn control_commands_are_json() {
        let msg = Msg::Control(Command::PartialResult(PartialResultSpec {
            id: PartialResultId::MODEL,
            method: MethodSpec::Qr,
            intercept: true,
            rows: 12,
            features: 2,
            responses: 1,
        }));

        let (aligned, len) = aligned_bytes(&msg);
        let bytes: &[u8] = bytemuck::cast_slice(&aligned);

        assert_eq!(Msg::deserialize(&bytes[..len]).unwrap(), msg);
        assert_eq!(&bytes[..HEADER_SIZE], CONTROL.to_be_bytes());
    }

    #[test]
    fn invalid_messages_are_rejected() {
        assert!(Msg::deserialize(&[0, 1, 2]).is_err());

        let mut unknown = 9u64.to_be_bytes().to_vec();
        unknown.extend_from_slice(b"junk");
        assert!(Msg::deserialize(&unknown).is_err());
    }
}
