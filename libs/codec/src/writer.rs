use bytes::{BufMut, Bytes, BytesMut};

use crate::EncodeError;

/// Largest value the four-byte Remaining Length field can carry.
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Largest field that fits behind a two-byte length prefix.
pub const MAX_FIELD_LENGTH: usize = u16::MAX as usize;

pub trait PacketWriter {
    fn write_remaining_length(&mut self, value: usize) -> Result<(), EncodeError>;

    fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError>;

    fn write_binary(&mut self, field: &'static str, value: &[u8]) -> Result<(), EncodeError>;
}

impl PacketWriter for BytesMut {
    #[inline]
    fn write_remaining_length(&mut self, value: usize) -> Result<(), EncodeError> {
        ensure!(value <= MAX_REMAINING_LENGTH, EncodeError::PacketTooLarge);

        let mut n = value;

        loop {
            let mut value = (n & 0x7f) as u8;
            n >>= 7;
            if n > 0 {
                value |= 0x80;
            }
            self.put_u8(value);
            if n == 0 {
                break;
            }
        }

        Ok(())
    }

    #[inline]
    fn write_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        self.write_binary(field, value.as_bytes())
    }

    #[inline]
    fn write_binary(&mut self, field: &'static str, value: &[u8]) -> Result<(), EncodeError> {
        let len = field_length(field, value)? - 2;
        self.put_u16(len as u16);
        self.put_slice(value);
        Ok(())
    }
}

/// Encodes `value` as an MQTT Remaining Length: base-128 little-endian
/// groups, bit 7 set on every byte but the last.
pub fn encode_remaining_length(value: usize) -> Result<Bytes, EncodeError> {
    let mut data = BytesMut::with_capacity(bytes_remaining_length(value)?);
    data.write_remaining_length(value)?;
    Ok(data.freeze())
}

#[inline]
pub fn bytes_remaining_length(value: usize) -> Result<usize, EncodeError> {
    match value {
        0..=127 => Ok(1),
        128..=16_383 => Ok(2),
        16_384..=2_097_151 => Ok(3),
        2_097_152..=MAX_REMAINING_LENGTH => Ok(4),
        _ => Err(EncodeError::PacketTooLarge),
    }
}

/// Size of a length-prefixed field on the wire.
#[inline]
pub(crate) fn field_length(field: &'static str, value: &[u8]) -> Result<usize, EncodeError> {
    ensure!(
        value.len() <= MAX_FIELD_LENGTH,
        EncodeError::FieldTooLong {
            field,
            len: value.len(),
        }
    );
    Ok(2 + value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_remaining_length(data: &[u8]) -> (usize, usize) {
        let mut value = 0;
        let mut shift = 0;
        for (idx, byte) in data.iter().enumerate() {
            value += ((byte & 0x7f) as usize) << shift;
            if byte & 0x80 == 0 {
                return (value, idx + 1);
            }
            shift += 7;
        }
        panic!("unterminated remaining length");
    }

    #[test]
    fn test_single_byte() {
        for len in 0..=127 {
            let data = encode_remaining_length(len).unwrap();
            assert_eq!(&data[..], &[len as u8]);
        }
    }

    #[test]
    fn test_two_bytes() {
        for len in 128..=16_383 {
            let data = encode_remaining_length(len).unwrap();
            assert_eq!(data.len(), 2);
            assert_eq!(decode_remaining_length(&data), (len, 2));
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(&encode_remaining_length(128).unwrap()[..], &[0x80, 0x01]);
        assert_eq!(&encode_remaining_length(16_383).unwrap()[..], &[0xff, 0x7f]);
        assert_eq!(
            &encode_remaining_length(16_384).unwrap()[..],
            &[0x80, 0x80, 0x01]
        );
        assert_eq!(
            &encode_remaining_length(2_097_151).unwrap()[..],
            &[0xff, 0xff, 0x7f]
        );
        assert_eq!(
            &encode_remaining_length(2_097_152).unwrap()[..],
            &[0x80, 0x80, 0x80, 0x01]
        );
        assert_eq!(
            &encode_remaining_length(MAX_REMAINING_LENGTH).unwrap()[..],
            &[0xff, 0xff, 0xff, 0x7f]
        );
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(
            encode_remaining_length(MAX_REMAINING_LENGTH + 1),
            Err(EncodeError::PacketTooLarge)
        ));
        assert!(matches!(
            bytes_remaining_length(1 << 28),
            Err(EncodeError::PacketTooLarge)
        ));
    }

    #[test]
    fn test_field_too_long() {
        let value = vec![b'a'; MAX_FIELD_LENGTH + 1];
        let mut data = BytesMut::new();
        assert!(matches!(
            data.write_binary("topic", &value),
            Err(EncodeError::FieldTooLong {
                field: "topic",
                len: 65_536
            })
        ));
        assert!(data.is_empty());

        data.write_binary("topic", &value[..MAX_FIELD_LENGTH]).unwrap();
        assert_eq!(&data[..2], &[0xff, 0xff]);
    }
}
