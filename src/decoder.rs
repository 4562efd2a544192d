use crate::alloc::{string::String, vec::Vec};
use crate::errors::OscError;
use crate::types::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

use nom::bytes::complete::take;
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::tuple;
use nom::IResult;

/// Common MTU size for ethernet; a convenient buffer-sizing hint for
/// callers reading datagrams off a UDP socket.
pub const MTU: usize = 1536;

/// The literal tag every bundle packet starts with.
const BUNDLE_TAG: &str = "#bundle";

/// Decodes a single OSC packet: a message or a (possibly nested) bundle.
/// Returns the decoded packet and whatever bytes remained unconsumed.
pub fn decode(msg: &[u8]) -> crate::errors::Result<(OscPacket, &[u8])> {
    finish(decode_packet(msg))
}

/// Decodes exactly one OSC message. Fails with [`OscError::BadTypeTag`] if
/// the packet is a bundle instead, or with the usual decode errors if the
/// message body is malformed.
pub fn decode_message(msg: &[u8]) -> crate::errors::Result<(OscMessage, &[u8])> {
    match finish(decode_packet(msg))? {
        (OscPacket::Message(m), rest) => Ok((m, rest)),
        (OscPacket::Bundle(_), _) => Err(OscError::BadTypeTag(
            "expected a message, found a bundle".into(),
        )),
    }
}

/// Decodes exactly one OSC bundle, recursively decoding its elements.
pub fn decode_bundle(msg: &[u8]) -> crate::errors::Result<(OscBundle, &[u8])> {
    finish(bundle(msg))
}

fn finish<T>(res: IResult<&[u8], T, OscError>) -> crate::errors::Result<(T, &[u8])> {
    match res {
        Ok((rest, value)) => Ok((value, rest)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            tracing::debug!(error = %e, "dropping malformed OSC packet");
            Err(e)
        }
        Err(nom::Err::Incomplete(_)) => {
            tracing::debug!("dropping truncated OSC packet");
            Err(OscError::Truncated)
        }
    }
}

fn decode_packet(input: &[u8]) -> IResult<&[u8], OscPacket, OscError> {
    match input.first() {
        Some(b'/') => map(message, OscPacket::Message)(input),
        Some(b'#') => map(bundle, OscPacket::Bundle)(input),
        Some(_) => Err(nom::Err::Error(OscError::BadTypeTag(
            "packet is neither a message nor a bundle".into(),
        ))),
        None => Err(nom::Err::Error(OscError::Truncated)),
    }
}

fn message(input: &[u8]) -> IResult<&[u8], OscMessage, OscError> {
    let (input, addr) = osc_string(input)?;
    let (input, type_tags) = osc_string(input)?;

    let mut tag_chars = type_tags.chars();
    match tag_chars.next() {
        Some(',') => {}
        _ => return Err(nom::Err::Error(OscError::BadTypeTag(type_tags))),
    }

    let mut args = Vec::with_capacity(type_tags.len().saturating_sub(1));
    let mut rest = input;
    for tag in tag_chars {
        let (next_rest, parsed) = arg(rest, tag)?;
        rest = next_rest;
        args.push(parsed);
    }

    Ok((rest, OscMessage { addr, args }))
}

fn bundle(input: &[u8]) -> IResult<&[u8], OscBundle, OscError> {
    let (input, tag) = osc_string(input)?;
    if tag != BUNDLE_TAG {
        return Err(nom::Err::Error(OscError::NotABundle));
    }

    let (input, (timetag, content)) = tuple((time_tag, many0(bundle_element)))(input)?;

    Ok((input, OscBundle { timetag, content }))
}

fn bundle_element(input: &[u8]) -> IResult<&[u8], OscPacket, OscError> {
    let (input, elem_size) = be_u32(input)?;
    let elem_size = elem_size as usize;
    if input.len() < elem_size {
        return Err(nom::Err::Error(OscError::Truncated));
    }
    let (input, elem_bytes) = take(elem_size)(input)?;
    let (leftover, packet) = decode_packet(elem_bytes)?;
    debug_assert!(
        leftover.is_empty(),
        "a bundle element's own length prefix bounds it exactly"
    );
    Ok((input, packet))
}

/// Reads a padded OSC string: bytes up to the first NUL, then however many
/// further NUL bytes land the cursor on the next 4-byte boundary relative to
/// the start of this string. Every preceding field is itself padded to a
/// multiple of 4, so a field-relative boundary is always a packet-relative
/// one too, and no absolute offset needs to be threaded through.
fn osc_string(input: &[u8]) -> IResult<&[u8], String, OscError> {
    let nul_pos = input
        .iter()
        .position(|&b| b == 0)
        .ok_or(nom::Err::Error(OscError::Truncated))?;
    let padded_len = crate::encoder::pad(nul_pos as u64 + 1) as usize;
    if input.len() < padded_len {
        return Err(nom::Err::Error(OscError::Truncated));
    }
    let s = core::str::from_utf8(&input[..nul_pos])
        .map_err(|_| nom::Err::Error(OscError::BadString))?
        .into();
    Ok((&input[padded_len..], s))
}

/// Reads exactly four bytes, failing with [`OscError::Truncated`] rather
/// than nom's own `Eof`/`Incomplete` machinery if fewer remain — `finish`
/// only ever sees `nom::Err::Incomplete` from combinators that opt into
/// streaming mode, which none of these do, so this is the one place that
/// has to check the length itself.
fn fixed4(input: &[u8]) -> IResult<&[u8], [u8; 4], OscError> {
    if input.len() < 4 {
        return Err(nom::Err::Error(OscError::Truncated));
    }
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&input[..4]);
    Ok((&input[4..], buf))
}

fn be_i32(input: &[u8]) -> IResult<&[u8], i32, OscError> {
    map(fixed4, i32::from_be_bytes)(input)
}

fn be_f32(input: &[u8]) -> IResult<&[u8], f32, OscError> {
    map(fixed4, f32::from_be_bytes)(input)
}

fn be_u32(input: &[u8]) -> IResult<&[u8], u32, OscError> {
    map(fixed4, u32::from_be_bytes)(input)
}

fn blob(input: &[u8]) -> IResult<&[u8], Vec<u8>, OscError> {
    let (input, size) = be_u32(input)?;
    let size = size as usize;
    let padded_len = crate::encoder::pad(size as u64) as usize;
    if input.len() < padded_len {
        return Err(nom::Err::Error(OscError::Truncated));
    }
    let data = input[..size].to_vec();
    Ok((&input[padded_len..], data))
}

fn time_tag(input: &[u8]) -> IResult<&[u8], OscTime, OscError> {
    map(tuple((be_u32, be_u32)), |(seconds, fractional)| OscTime {
        seconds,
        fractional,
    })(input)
}

fn arg(input: &[u8], tag: char) -> IResult<&[u8], OscType, OscError> {
    match tag {
        'i' => map(be_i32, OscType::Int)(input),
        'f' => map(be_f32, OscType::Float)(input),
        's' => map(osc_string, OscType::String)(input),
        'b' => map(blob, OscType::Blob)(input),
        't' => map(time_tag, OscType::Time)(input),
        'T' => Ok((input, OscType::Bool(true))),
        'F' => Ok((input, OscType::Bool(false))),
        'N' => Ok((input, OscType::Nil)),
        'I' => Ok((input, OscType::Inf)),
        other => {
            let mut tag_string = String::new();
            tag_string.push(other);
            Err(nom::Err::Error(OscError::BadTypeTag(tag_string)))
        }
    }
}
