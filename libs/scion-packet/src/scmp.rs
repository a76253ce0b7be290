//! SCMP, the SCION control message protocol.
//!
//! Only echo request and echo reply are translated; every other message type
//! is reported as unsupported and dropped by the caller. The checksum field
//! is emitted as zero, the SCION layer validates it separately.

pub const TYPE_ECHO_REQUEST: u8 = 128;
pub const TYPE_ECHO_REPLY: u8 = 129;

const HEADER_LEN: usize = 8;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("SCMP message too short: {0} bytes")]
    Truncated(usize),
    #[error("unsupported SCMP type: {0}")]
    UnsupportedType(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echo {
    pub id: u16,
    pub seq: u16,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmpMessage {
    EchoRequest(Echo),
    EchoReply(Echo),
}

impl ScmpMessage {
    pub fn parse(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_LEN {
            return Err(Error::Truncated(buf.len()));
        }

        let echo = Echo {
            id: u16::from_be_bytes([buf[4], buf[5]]),
            seq: u16::from_be_bytes([buf[6], buf[7]]),
            data: buf[HEADER_LEN..].to_vec(),
        };

        match buf[0] {
            TYPE_ECHO_REQUEST => Ok(ScmpMessage::EchoRequest(echo)),
            TYPE_ECHO_REPLY => Ok(ScmpMessage::EchoReply(echo)),
            other => Err(Error::UnsupportedType(other)),
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let echo = self.echo();

        let mut buf = Vec::with_capacity(HEADER_LEN + echo.data.len());
        buf.push(self.scmp_type());
        buf.push(0); // Code.
        buf.extend_from_slice(&[0, 0]); // Checksum.
        buf.extend_from_slice(&echo.id.to_be_bytes());
        buf.extend_from_slice(&echo.seq.to_be_bytes());
        buf.extend_from_slice(&echo.data);

        buf
    }

    pub fn scmp_type(&self) -> u8 {
        match self {
            ScmpMessage::EchoRequest(_) => TYPE_ECHO_REQUEST,
            ScmpMessage::EchoReply(_) => TYPE_ECHO_REPLY,
        }
    }

    pub fn echo(&self) -> &Echo {
        match self {
            ScmpMessage::EchoRequest(echo) | ScmpMessage::EchoReply(echo) => echo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn serializes_echo_request() {
        let message = ScmpMessage::EchoRequest(Echo {
            id: 1,
            seq: 2,
            data: b"ping".to_vec(),
        });

        assert_eq!(message.serialize(), hex!("80000000 00010002 70696e67"));
    }

    #[test]
    fn parse_inverts_serialize() {
        let message = ScmpMessage::EchoReply(Echo {
            id: 0xbeef,
            seq: 42,
            data: b"pong".to_vec(),
        });

        assert_eq!(ScmpMessage::parse(&message.serialize()).unwrap(), message);
    }

    #[test]
    fn rejects_non_echo_types() {
        // SCMP external interface down (type 5).
        let wire = hex!("05000000 00000000");

        assert_eq!(ScmpMessage::parse(&wire), Err(Error::UnsupportedType(5)));
    }

    #[test]
    fn rejects_short_messages() {
        assert_eq!(ScmpMessage::parse(&[128, 0]), Err(Error::Truncated(2)));
    }
}
