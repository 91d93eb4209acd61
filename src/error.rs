//! X.509 extension errors

use crate::conf::ConfValue;
use asn1_rs::{Error as Asn1Error, SerializeError};
use nom::IResult;

/// An error that can occur while decoding or encoding an extension value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum X509Error {
    #[error("invalid Policy Constraints")]
    InvalidPolicyConstraints,
    #[error("empty Policy Constraints")]
    EmptyPolicyConstraints,
    #[error("invalid extensions")]
    InvalidExtensions,

    #[error("DER encoding error: {0}")]
    Encoding(String),
    #[error("BER error: {0}")]
    Der(#[from] Asn1Error),
}

/// Holds the result of parsing functions (X.509)
///
/// Note that this type is also a `Result`, so usual functions (`map`, `unwrap` etc.) are available.
pub type X509Result<'a, T> = IResult<&'a [u8], T, X509Error>;

impl From<nom::Err<X509Error>> for X509Error {
    fn from(e: nom::Err<X509Error>) -> X509Error {
        match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            nom::Err::Incomplete(n) => X509Error::Der(Asn1Error::Incomplete(n)),
        }
    }
}

impl From<SerializeError> for X509Error {
    fn from(e: SerializeError) -> X509Error {
        match e {
            SerializeError::ASN1Error(e) => X509Error::Der(e),
            e => X509Error::Encoding(e.to_string()),
        }
    }
}

/// An error that can occur while building an extension from configuration values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfError {
    #[error("invalid name ({0})")]
    UnknownAttribute(ConfValue),
    #[error("invalid integer value ({0})")]
    InvalidInteger(ConfValue),
    #[error("illegal empty extension")]
    EmptyExtension,

    #[error("invalid null name")]
    InvalidNullName,
    #[error("invalid null value for '{0}'")]
    InvalidNullValue(String),

    #[error("unknown extension name '{0}'")]
    UnknownExtension(String),
    #[error("extension setting not supported for '{0}'")]
    Unsupported(String),

    #[error("extension encoding failed: {0}")]
    Encode(#[from] X509Error),
}
