#[cfg(feature = "std")]
use core::fmt::{self, Display};

#[cfg(feature = "std")]
use std::{
    convert::TryFrom,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

#[cfg(feature = "std")]
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// A time tag in an OSC message consists of two 32-bit integers where the
/// first one denotes the number of seconds since 1900-01-01 and the second
/// the fractions of a second. See
/// <http://opensoundcontrol.org/node/3/#timetags> for details on its
/// semantics. The value `(0, 1)` means "execute immediately".
///
/// # Examples
///
/// ```
/// #[cfg(feature = "std")]
/// {
///     use oscore::OscTime;
///     use std::{convert::TryFrom, time::UNIX_EPOCH};
///
///     assert_eq!(
///         OscTime::try_from(UNIX_EPOCH).unwrap(),
///         OscTime::from((2_208_988_800, 0))
///     );
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OscTime {
    pub seconds: u32,
    pub fractional: u32,
}

impl OscTime {
    /// "Execute immediately", per the OSC 1.1 spec.
    pub const IMMEDIATELY: OscTime = OscTime {
        seconds: 0,
        fractional: 1,
    };
}

// `from_ntp_seconds`/`as_ntp_seconds` and the `SystemTime` conversions below
// all go through `f64`, which needs `std`: `core::f64` has no `trunc`/`round`.
#[cfg(feature = "std")]
impl OscTime {
    const UNIX_OFFSET: u64 = 2_208_988_800; // From RFC 5905
    const TWO_POW_32: f64 = (u32::MAX as f64) + 1.0;
    const ONE_OVER_TWO_POW_32: f64 = 1.0 / OscTime::TWO_POW_32;
    const NANOS_PER_SECOND: f64 = 1.0e9;
    const SECONDS_PER_NANO: f64 = 1.0 / OscTime::NANOS_PER_SECOND;

    /// Build a time tag from a real-valued number of seconds since the NTP
    /// epoch (1900-01-01 UTC), splitting it into integer seconds and a
    /// fractional field with ~200 picosecond resolution.
    pub fn from_ntp_seconds(seconds_since_ntp_epoch: f64) -> OscTime {
        let whole = seconds_since_ntp_epoch.trunc();
        let frac = seconds_since_ntp_epoch - whole;
        OscTime {
            seconds: whole as u32,
            fractional: (frac * OscTime::TWO_POW_32).round() as u32,
        }
    }

    /// The inverse of [`OscTime::from_ntp_seconds`].
    pub fn as_ntp_seconds(&self) -> f64 {
        self.seconds as f64 + (self.fractional as f64) * OscTime::ONE_OVER_TWO_POW_32
    }
}

#[cfg(feature = "std")]
impl TryFrom<SystemTime> for OscTime {
    type Error = OscTimeError;

    fn try_from(time: SystemTime) -> core::result::Result<OscTime, OscTimeError> {
        let duration_since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| OscTimeError(OscTimeErrorKind::BeforeEpoch))?
            + Duration::new(OscTime::UNIX_OFFSET, 0);
        let seconds = u32::try_from(duration_since_epoch.as_secs())
            .map_err(|_| OscTimeError(OscTimeErrorKind::Overflow))?;
        let nanos = duration_since_epoch.subsec_nanos() as f64;
        let fractional = (nanos * OscTime::SECONDS_PER_NANO * OscTime::TWO_POW_32).round() as u32;
        Ok(OscTime {
            seconds,
            fractional,
        })
    }
}

#[cfg(feature = "std")]
impl From<OscTime> for SystemTime {
    fn from(time: OscTime) -> SystemTime {
        let nanos =
            (time.fractional as f64) * OscTime::ONE_OVER_TWO_POW_32 * OscTime::NANOS_PER_SECOND;
        let duration_since_osc_epoch = Duration::new(time.seconds as u64, nanos.round() as u32);
        let duration_since_unix_epoch =
            duration_since_osc_epoch - Duration::new(OscTime::UNIX_OFFSET, 0);
        UNIX_EPOCH + duration_since_unix_epoch
    }
}

#[cfg(feature = "std")]
impl Display for OscTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time: OffsetDateTime = SystemTime::from(*self).into();
        let formatted = time.format(&Iso8601::DEFAULT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl From<(u32, u32)> for OscTime {
    fn from(time: (u32, u32)) -> OscTime {
        let (seconds, fractional) = time;
        OscTime {
            seconds,
            fractional,
        }
    }
}

impl From<OscTime> for (u32, u32) {
    fn from(time: OscTime) -> (u32, u32) {
        (time.seconds, time.fractional)
    }
}

/// An error returned by conversions involving [`OscTime`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct OscTimeError(OscTimeErrorKind);

#[cfg(feature = "std")]
#[derive(Debug)]
enum OscTimeErrorKind {
    BeforeEpoch,
    Overflow,
}

#[cfg(feature = "std")]
impl Display for OscTimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            OscTimeErrorKind::BeforeEpoch => {
                write!(f, "time is before the unix epoch and cannot be stored")
            }
            OscTimeErrorKind::Overflow => {
                write!(f, "time overflows what OSC time can store")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OscTimeError {}

/// A single, tagged OSC argument value.
///
/// Only the nine tags specified by OSC 1.1's required set are represented;
/// see the OSC 1.1 spec's optional types for the ones this crate leaves out.
#[derive(Clone, Debug, PartialEq)]
pub enum OscType {
    Int(i32),
    Float(f32),
    String(String),
    Blob(Vec<u8>),
    Time(OscTime),
    Bool(bool),
    Nil,
    Inf,
}

impl OscType {
    /// The one-character tag this argument contributes to a message's
    /// type-tag string.
    pub fn tag(&self) -> char {
        match self {
            OscType::Int(_) => 'i',
            OscType::Float(_) => 'f',
            OscType::String(_) => 's',
            OscType::Blob(_) => 'b',
            OscType::Time(_) => 't',
            OscType::Bool(true) => 'T',
            OscType::Bool(false) => 'F',
            OscType::Nil => 'N',
            OscType::Inf => 'I',
        }
    }

    pub fn int(self) -> Option<i32> {
        match self {
            OscType::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn float(self) -> Option<f32> {
        match self {
            OscType::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn string(self) -> Option<String> {
        match self {
            OscType::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn blob(self) -> Option<Vec<u8>> {
        match self {
            OscType::Blob(v) => Some(v),
            _ => None,
        }
    }

    pub fn time(self) -> Option<OscTime> {
        match self {
            OscType::Time(v) => Some(v),
            _ => None,
        }
    }

    pub fn bool(self) -> Option<bool> {
        match self {
            OscType::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for OscType {
    fn from(v: i32) -> Self {
        OscType::Int(v)
    }
}
impl core::convert::TryFrom<i64> for OscType {
    type Error = crate::errors::OscError;

    /// Build an `i` argument from a wider integer, rejecting values outside
    /// `[-2^31, 2^31 - 1]` with [`crate::OscError::Overflow`].
    fn try_from(v: i64) -> core::result::Result<Self, Self::Error> {
        i32::try_from(v)
            .map(OscType::Int)
            .map_err(|_| crate::errors::OscError::Overflow)
    }
}
impl From<f32> for OscType {
    fn from(v: f32) -> Self {
        OscType::Float(v)
    }
}
impl From<String> for OscType {
    fn from(v: String) -> Self {
        OscType::String(v)
    }
}
impl<'a> From<&'a str> for OscType {
    fn from(v: &'a str) -> Self {
        OscType::String(v.to_string())
    }
}
impl From<Vec<u8>> for OscType {
    fn from(v: Vec<u8>) -> Self {
        OscType::Blob(v)
    }
}
impl From<OscTime> for OscType {
    fn from(v: OscTime) -> Self {
        OscType::Time(v)
    }
}
impl From<(u32, u32)> for OscType {
    fn from(time: (u32, u32)) -> Self {
        OscType::Time(time.into())
    }
}
impl From<bool> for OscType {
    fn from(v: bool) -> Self {
        OscType::Bool(v)
    }
}

#[cfg(feature = "std")]
impl Display for OscType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscType::Int(v) => write!(f, "(i) {v}"),
            OscType::Float(v) => write!(f, "(f) {v}"),
            OscType::String(v) => write!(f, "(s) {v}"),
            OscType::Blob(v) => {
                f.write_str("(b)")?;
                if v.is_empty() {
                    return Ok(());
                }
                f.write_str(" 0x")?;
                for octet in v {
                    write!(f, "{:02X}", octet)?;
                }
                Ok(())
            }
            OscType::Time(v) => write!(f, "(t) {v}"),
            OscType::Bool(v) => f.write_str(if *v { "(T)" } else { "(F)" }),
            OscType::Nil => f.write_str("(N)"),
            OscType::Inf => f.write_str("(I)"),
        }
    }
}

/// An OSC message consists of an address and zero or more arguments. The
/// address should name an element of whatever you're controlling; the
/// arguments set properties of that element.
#[derive(Clone, Debug, PartialEq)]
pub struct OscMessage {
    pub addr: String,
    pub args: Vec<OscType>,
}

impl OscMessage {
    /// The `,`-prefixed type-tag string derived from `args`, e.g. `",ifs"`.
    pub fn type_tag_string(&self) -> String {
        let mut tags = String::with_capacity(self.args.len() + 1);
        tags.push(',');
        for arg in &self.args {
            tags.push(arg.tag());
        }
        tags
    }
}

#[cfg(feature = "std")]
impl Display for OscMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(OscType::to_string)
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{}, {}", self.addr, args)
    }
}

impl From<String> for OscMessage {
    fn from(s: String) -> OscMessage {
        OscMessage {
            addr: s,
            args: vec![],
        }
    }
}
impl<'a> From<&'a str> for OscMessage {
    fn from(s: &str) -> OscMessage {
        OscMessage {
            addr: s.to_string(),
            args: vec![],
        }
    }
}

/// An *osc packet* can contain an *osc message* or a bundle of nested
/// messages, which is called an *osc bundle*.
#[derive(Clone, Debug, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

#[cfg(feature = "std")]
impl Display for OscPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscPacket::Message(m) => m.fmt(f),
            OscPacket::Bundle(b) => b.fmt(f),
        }
    }
}

/// An OSC bundle contains zero or more OSC packets and a time tag. The
/// contained packets *should* be applied at the given time tag; this crate
/// does not schedule them (see the crate-level docs).
#[derive(Clone, Debug, PartialEq)]
pub struct OscBundle {
    pub timetag: OscTime,
    pub content: Vec<OscPacket>,
}

impl OscBundle {
    /// Build an empty bundle carrying the "execute immediately" time tag.
    pub fn new() -> Self {
        OscBundle {
            timetag: OscTime::IMMEDIATELY,
            content: Vec::new(),
        }
    }

    /// Append a message or nested bundle to this bundle's contents.
    pub fn add(&mut self, element: impl Into<OscPacket>) {
        self.content.push(element.into());
    }

    /// The flattened, depth-first sequence of every message contained
    /// anywhere in this bundle, descending into nested bundles.
    pub fn messages(&self) -> Vec<&OscMessage> {
        let mut out = Vec::new();
        self.collect_messages(&mut out);
        out
    }

    fn collect_messages<'a>(&'a self, out: &mut Vec<&'a OscMessage>) {
        for packet in &self.content {
            match packet {
                OscPacket::Message(m) => out.push(m),
                OscPacket::Bundle(b) => b.collect_messages(out),
            }
        }
    }
}

impl Default for OscBundle {
    fn default() -> Self {
        OscBundle::new()
    }
}

#[cfg(feature = "std")]
impl Display for OscBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = self
            .content
            .iter()
            .map(OscPacket::to_string)
            .collect::<Vec<String>>()
            .join("; ");
        write!(f, "#bundle {} {{ {} }}", self.timetag, content)
    }
}

impl From<OscMessage> for OscPacket {
    fn from(m: OscMessage) -> Self {
        OscPacket::Message(m)
    }
}
impl From<OscBundle> for OscPacket {
    fn from(b: OscBundle) -> Self {
        OscPacket::Bundle(b)
    }
}
