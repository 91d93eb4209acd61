//! Configuration values
//!
//! Certificate generation tools describe extensions with short text lines, for example
//! `requireExplicitPolicy:1,inhibitPolicyMapping:0`. Once tokenized, each entry is a
//! [`ConfValue`]: a name and an optional value. Extension codecs consume ordered lists of
//! these values to build extensions, and produce them to display extensions.

use crate::error::ConfError;
use crate::extensions::SkipCerts;
use log::debug;
use std::fmt;

/// A tokenized configuration entry (`name:value`, or a bare `name`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfValue {
    pub name: String,
    pub value: Option<String>,
}

impl ConfValue {
    /// Creates a new `name:value` entry
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        ConfValue {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Creates an entry without value
    pub fn name_only<N: Into<String>>(name: N) -> Self {
        ConfValue {
            name: name.into(),
            value: None,
        }
    }

    /// Return the value as a string slice, if present
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for ConfValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "name:{}, value:{}", self.name, value),
            None => write!(f, "name:{}", self.name),
        }
    }
}

/// Split a configuration line into a list of values
///
/// Entries are separated by `,`. Each entry is either `name:value` or `name`. Whitespace
/// around names and values is ignored.
///
/// ```rust
/// use x509_policy_constraints::conf::{parse_conf_list, ConfValue};
///
/// let values = parse_conf_list("requireExplicitPolicy:1, inhibitPolicyMapping: 0").unwrap();
/// assert_eq!(
///     values,
///     vec![
///         ConfValue::new("requireExplicitPolicy", "1"),
///         ConfValue::new("inhibitPolicyMapping", "0"),
///     ]
/// );
/// ```
pub fn parse_conf_list(line: &str) -> Result<Vec<ConfValue>, ConfError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',').map(parse_conf_entry).collect()
}

fn parse_conf_entry(entry: &str) -> Result<ConfValue, ConfError> {
    let (name, value) = match entry.split_once(':') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (entry.trim(), None),
    };
    if name.is_empty() {
        debug!("configuration entry without name: '{}'", entry);
        return Err(ConfError::InvalidNullName);
    }
    match value {
        Some("") => Err(ConfError::InvalidNullValue(name.to_owned())),
        Some(value) => Ok(ConfValue::new(name, value)),
        None => Ok(ConfValue::name_only(name)),
    }
}

/// Read the value of a configuration entry as a `SkipCerts` integer
///
/// Only unsigned decimal numbers are accepted: no sign, no digit grouping, no fractional
/// part. There is no upper bound.
pub fn get_value_skip_certs(conf: &ConfValue) -> Result<SkipCerts, ConfError> {
    let digits = match conf.value() {
        Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s,
        _ => {
            debug!("invalid integer value ({})", conf);
            return Err(ConfError::InvalidInteger(conf.clone()));
        }
    };
    digits
        .parse::<SkipCerts>()
        .map_err(|_| ConfError::InvalidInteger(conf.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conf_list_simple() {
        let values = parse_conf_list("requireExplicitPolicy:3").expect("parse_conf_list");
        assert_eq!(values, vec![ConfValue::new("requireExplicitPolicy", "3")]);

        let values = parse_conf_list("  a : 1 ,b,c:x y ").expect("parse_conf_list");
        assert_eq!(
            values,
            vec![
                ConfValue::new("a", "1"),
                ConfValue::name_only("b"),
                ConfValue::new("c", "x y"),
            ]
        );

        assert_eq!(parse_conf_list("   "), Ok(Vec::new()));
    }

    #[test]
    fn conf_list_errors() {
        assert_eq!(parse_conf_list("a:1,,b:2"), Err(ConfError::InvalidNullName));
        assert_eq!(parse_conf_list(":1"), Err(ConfError::InvalidNullName));
        assert_eq!(
            parse_conf_list("a:1,b:"),
            Err(ConfError::InvalidNullValue("b".to_string()))
        );
    }

    #[test]
    fn conf_value_display() {
        assert_eq!(
            ConfValue::new("foo", "1").to_string(),
            "name:foo, value:1"
        );
        assert_eq!(ConfValue::name_only("foo").to_string(), "name:foo");
    }

    #[test]
    fn skip_certs_values() {
        let v = get_value_skip_certs(&ConfValue::new("x", "0")).expect("zero");
        assert_eq!(v, SkipCerts::from(0u32));
        let v = get_value_skip_certs(&ConfValue::new("x", "007")).expect("leading zeroes");
        assert_eq!(v, SkipCerts::from(7u32));
        let v = get_value_skip_certs(&ConfValue::new("x", "340282366920938463463374607431768211456"))
            .expect("2^128");
        assert_eq!(v, SkipCerts::from(u128::MAX) + 1u32);

        for bad in &["", "-1", "+1", "abc", "1_000", "1,5", "1.0", " 1", "0x10"] {
            let conf = ConfValue::new("x", *bad);
            assert_eq!(
                get_value_skip_certs(&conf),
                Err(ConfError::InvalidInteger(conf.clone())),
                "value {:?} should be rejected",
                bad
            );
        }
        let conf = ConfValue::name_only("x");
        assert_eq!(
            get_value_skip_certs(&conf),
            Err(ConfError::InvalidInteger(conf.clone()))
        );
    }
}
