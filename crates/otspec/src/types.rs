use crate::DeserializationError;
use crate::Deserialize;
use crate::Deserializer;
use crate::ReaderContext;
use crate::SerializationError;
use crate::Serialize;
use chrono::{DateTime, NaiveDateTime};

pub type uint8 = u8;
pub type uint16 = u16;
pub type uint32 = u32;
pub type int16 = i16;
pub type int32 = i32;
pub type FWORD = i16;
pub type UFWORD = u16;

/// Seconds between 1904-01-01 and the Unix epoch.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// A signed 16.16 fixed-point number, held as its raw bits.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const fn from_integer(value: i16) -> Self {
        Fixed((value as i32) << 16)
    }

    /// Build a value from an integer part and a decimal fraction given as
    /// `numerator / 10^digits`, rounded to the nearest 1/65536.
    pub fn from_decimal(integer: i16, numerator: u32, digits: u32) -> Self {
        let denominator = 10_i64.pow(digits.min(9));
        let frac = (i64::from(numerator) * 65536 + denominator / 2) / denominator;
        Fixed(((i64::from(integer) << 16) + frac.min(0xFFFF)) as i32)
    }
}

impl Serialize for Fixed {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.0.to_bytes(data)
    }
}
impl Deserialize for Fixed {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        Ok(Fixed(c.de()?))
    }
}

/// A date as seconds since 1904-01-01 00:00 UTC.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LONGDATETIME(pub i64);

impl LONGDATETIME {
    /// The date, if it is representable.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(self.0 - MAC_EPOCH_OFFSET, 0).map(|dt| dt.naive_utc())
    }
}

impl Serialize for LONGDATETIME {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.0.to_bytes(data)
    }
}
impl Deserialize for LONGDATETIME {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        Ok(LONGDATETIME(c.de()?))
    }
}

impl From<NaiveDateTime> for LONGDATETIME {
    fn from(date: NaiveDateTime) -> Self {
        Self(date.and_utc().timestamp() + MAC_EPOCH_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser;
    use chrono::NaiveDate;

    #[test]
    fn fixed_versions() {
        assert_eq!(
            ser::to_bytes(&Fixed::from_integer(3)).unwrap(),
            vec![0x00, 0x03, 0x00, 0x00]
        );
        assert_eq!(Fixed::from_decimal(1, 5, 1), Fixed(0x0001_8000));
        assert_eq!(Fixed::from_decimal(1, 0, 0), Fixed(0x0001_0000));
        assert_eq!(Fixed::from_decimal(2, 1, 3), Fixed(0x0002_0042));
    }

    #[test]
    fn longdatetime_epochs() {
        let unix = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(LONGDATETIME::from(unix), LONGDATETIME(MAC_EPOCH_OFFSET));
        assert_eq!(LONGDATETIME(MAC_EPOCH_OFFSET).to_datetime(), Some(unix));
        let mac = NaiveDate::from_ymd_opt(1904, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(LONGDATETIME::from(mac), LONGDATETIME(0));
    }
}
