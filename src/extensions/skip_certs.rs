use asn1_rs::{
    Any, BigUint, CheckDerConstraints, Class, FromDer, Header, Integer, Length, SerializeResult,
    Tag, ToDer,
};
use nom::Err;

use crate::error::{X509Error, X509Result};

/// <pre>
/// SkipCerts ::= INTEGER (0..MAX)
/// </pre>
///
/// The value is not bounded: it is stored as an arbitrary-precision unsigned integer.
pub type SkipCerts = BigUint;

/// Parse an optional `[tag] IMPLICIT SkipCerts` field
///
/// If the next object does not have the expected context-specific tag, or if input is empty,
/// no data is consumed and `None` is returned.
pub(crate) fn parse_opt_tagged_skip_certs(tag: u32, i: &[u8]) -> X509Result<Option<SkipCerts>> {
    if i.is_empty() {
        return Ok((i, None));
    }
    let (rem, any) = <Any as FromDer>::from_der(i).map_err(Err::convert)?;
    if any.class() != Class::ContextSpecific || any.tag() != Tag(tag) {
        return Ok((i, None));
    }
    // primitive, minimal encoding, not empty
    <Integer as CheckDerConstraints>::check_constraints(&any)
        .map_err(|e| Err::Error(e.into()))?;
    // length octets must use the shortest form
    let header_len = tagged_header(tag, any.data.len())
        .to_der_len()
        .map_err(|e| Err::Error(e.into()))?;
    if i.len() - rem.len() != header_len + any.data.len() {
        return Err(Err::Error(X509Error::InvalidPolicyConstraints));
    }
    let value = Integer::new(any.data)
        .as_biguint()
        .map_err(|e| Err::Error(e.into()))?;
    Ok((rem, Some(value)))
}

/// Content octets of a non-negative INTEGER: big-endian, minimal two's-complement
fn skip_certs_content(value: &SkipCerts) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    match bytes.first() {
        None => bytes.push(0),
        Some(b) if b & 0x80 != 0 => bytes.insert(0, 0),
        _ => (),
    }
    bytes
}

fn tagged_header(tag: u32, len: usize) -> Header<'static> {
    Header::new(Class::ContextSpecific, false, Tag(tag), Length::Definite(len))
}

/// Length of the DER encoding of a `[tag] IMPLICIT SkipCerts` field
pub(crate) fn tagged_skip_certs_len(tag: u32, value: &SkipCerts) -> asn1_rs::Result<usize> {
    // minimal two's complement: floor(bits / 8) + 1 octets
    let len = (value.bits() / 8) as usize + 1;
    Ok(tagged_header(tag, len).to_der_len()? + len)
}

/// DER encoding of a `[tag] IMPLICIT SkipCerts` field
pub(crate) fn encode_tagged_skip_certs(tag: u32, value: &SkipCerts) -> SerializeResult<Vec<u8>> {
    let content = skip_certs_content(value);
    let mut v = tagged_header(tag, content.len()).to_der_vec()?;
    v.extend_from_slice(&content);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::X509Error;
    use asn1_rs::{DerConstraint, Error};
    use hex_literal::hex;

    #[test]
    fn skip_certs_tagged_parse() {
        let bytes = &hex!("80 01 00");
        let (rem, res) = parse_opt_tagged_skip_certs(0, bytes).expect("SkipCerts");
        assert!(rem.is_empty());
        assert_eq!(res, Some(SkipCerts::from(0u32)));

        let bytes = &hex!("81 02 13 88 ff");
        let (rem, res) = parse_opt_tagged_skip_certs(1, bytes).expect("SkipCerts");
        assert_eq!(rem, &[0xff]);
        assert_eq!(res, Some(SkipCerts::from(5000u32)));

        // other tag: not present
        let (rem, res) = parse_opt_tagged_skip_certs(0, bytes).expect("SkipCerts");
        assert_eq!(rem, bytes);
        assert_eq!(res, None);

        // universal INTEGER is not an implicitly tagged field
        let bytes = &hex!("02 01 05");
        let (_, res) = parse_opt_tagged_skip_certs(0, bytes).expect("SkipCerts");
        assert_eq!(res, None);

        // wider than 64 bits
        let bytes = &hex!("80 09 01 00 00 00 00 00 00 00 00");
        let (_, res) = parse_opt_tagged_skip_certs(0, bytes).expect("SkipCerts");
        assert_eq!(res, Some(SkipCerts::from(u64::MAX) + 1u32));
    }

    #[test]
    fn skip_certs_tagged_parse_errors() {
        // negative
        let bytes = &hex!("80 01 ff");
        assert_eq!(
            parse_opt_tagged_skip_certs(0, bytes),
            Err(Err::Error(X509Error::Der(Error::IntegerNegative)))
        );
        // leading zero
        let bytes = &hex!("80 02 00 01");
        assert_eq!(
            parse_opt_tagged_skip_certs(0, bytes),
            Err(Err::Error(X509Error::Der(Error::DerConstraintFailed(
                DerConstraint::IntegerLeadingZeroes
            ))))
        );
        // empty content
        let bytes = &hex!("80 00");
        assert!(parse_opt_tagged_skip_certs(0, bytes).is_err());
        // constructed
        let bytes = &hex!("a0 03 02 01 01");
        assert!(parse_opt_tagged_skip_certs(0, bytes).is_err());
        // truncated
        let bytes = &hex!("80 02 01");
        assert!(parse_opt_tagged_skip_certs(0, bytes).is_err());
        // long form length
        let bytes = &hex!("80 81 01 05");
        assert_eq!(
            parse_opt_tagged_skip_certs(0, bytes),
            Err(Err::Error(X509Error::InvalidPolicyConstraints))
        );
        let bytes = &hex!("81 82 00 01 05");
        assert_eq!(
            parse_opt_tagged_skip_certs(1, bytes),
            Err(Err::Error(X509Error::InvalidPolicyConstraints))
        );
    }

    #[test]
    fn skip_certs_tagged_encode() {
        let v = encode_tagged_skip_certs(0, &SkipCerts::from(0u32)).expect("encode");
        assert_eq!(v, hex!("80 01 00"));
        let v = encode_tagged_skip_certs(1, &SkipCerts::from(0x7fu32)).expect("encode");
        assert_eq!(v, hex!("81 01 7f"));
        let v = encode_tagged_skip_certs(1, &SkipCerts::from(0x80u32)).expect("encode");
        assert_eq!(v, hex!("81 02 00 80"));
        let v = encode_tagged_skip_certs(0, &SkipCerts::from(5000u32)).expect("encode");
        assert_eq!(v, hex!("80 02 13 88"));
    }

    #[test]
    fn skip_certs_tagged_len() {
        let values = [
            SkipCerts::from(0u32),
            SkipCerts::from(0x7fu32),
            SkipCerts::from(0x80u32),
            SkipCerts::from(0xffffu32),
            SkipCerts::from(u64::MAX),
            // content longer than 127 octets needs a long form length
            SkipCerts::from(1u32) << 1100,
        ];
        for value in &values {
            let v = encode_tagged_skip_certs(1, value).expect("encode");
            assert_eq!(tagged_skip_certs_len(1, value), Ok(v.len()));
        }
    }
}
