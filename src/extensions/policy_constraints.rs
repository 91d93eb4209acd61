use asn1_rs::{Class, FromDer, Header, Length, Sequence, SerializeResult, Tag, Tagged, ToDer};
use log::debug;
use nom::Err;
use std::io::Write;

use crate::conf::{get_value_skip_certs, ConfValue};
use crate::error::{ConfError, X509Error, X509Result};

use super::skip_certs::{
    encode_tagged_skip_certs, parse_opt_tagged_skip_certs, tagged_skip_certs_len,
};
use super::SkipCerts;

/// Configuration name of the `requireExplicitPolicy` field
pub const REQUIRE_EXPLICIT_POLICY: &str = "requireExplicitPolicy";
/// Configuration name of the `inhibitPolicyMapping` field
pub const INHIBIT_POLICY_MAPPING: &str = "inhibitPolicyMapping";

/// Display label of the `requireExplicitPolicy` field
pub const REQUIRE_EXPLICIT_POLICY_LABEL: &str = "Require Explicit Policy";
/// Display label of the `inhibitPolicyMapping` field
pub const INHIBIT_POLICY_MAPPING_LABEL: &str = "Inhibit Policy Mapping";

/// "Policy Constraints" extension: constrains path validation by requiring explicit policy
/// identification, or by inhibiting policy mapping, after a number of certificates.
///
/// <pre>
/// id-ce-policyConstraints OBJECT IDENTIFIER ::=  { id-ce 36 }
///
/// -- IMPLICIT tags
/// PolicyConstraints ::= SEQUENCE {
///     requireExplicitPolicy   [0]     SkipCerts OPTIONAL,
///     inhibitPolicyMapping    [1]     SkipCerts OPTIONAL }
///
/// SkipCerts ::= INTEGER (0..MAX)
/// </pre>
///
/// At least one field is always present: RFC 5280 forbids an empty sequence, and all
/// constructors of this type reject it. Note that a value of `0` is not the same as an
/// absent field.
///
/// # Example
///
/// ```rust
/// use x509_policy_constraints::asn1_rs::{FromDer, ToDer};
/// use x509_policy_constraints::extensions::{PolicyConstraints, SkipCerts};
///
/// let pc = PolicyConstraints::new(Some(SkipCerts::from(0u32)), None).unwrap();
/// let der = pc.to_der_vec().unwrap();
/// assert_eq!(der, vec![0x30, 0x03, 0x80, 0x01, 0x00]);
///
/// let (rem, decoded) = PolicyConstraints::from_der(&der).unwrap();
/// assert!(rem.is_empty());
/// assert_eq!(decoded, pc);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyConstraints {
    require_explicit_policy: Option<SkipCerts>,
    inhibit_policy_mapping: Option<SkipCerts>,
}

impl PolicyConstraints {
    /// Build a `PolicyConstraints` value.
    ///
    /// Returns `EmptyPolicyConstraints` if both fields are absent.
    pub fn new(
        require_explicit_policy: Option<SkipCerts>,
        inhibit_policy_mapping: Option<SkipCerts>,
    ) -> Result<Self, X509Error> {
        if require_explicit_policy.is_none() && inhibit_policy_mapping.is_none() {
            return Err(X509Error::EmptyPolicyConstraints);
        }
        Ok(PolicyConstraints {
            require_explicit_policy,
            inhibit_policy_mapping,
        })
    }

    /// Number of additional certificates after which an explicit policy is required
    #[inline]
    pub fn require_explicit_policy(&self) -> Option<&SkipCerts> {
        self.require_explicit_policy.as_ref()
    }

    /// Number of additional certificates after which policy mapping is inhibited
    #[inline]
    pub fn inhibit_policy_mapping(&self) -> Option<&SkipCerts> {
        self.inhibit_policy_mapping.as_ref()
    }

    /// Append the human-readable form of this extension to `list`.
    ///
    /// `Require Explicit Policy` always comes before `Inhibit Policy Mapping`. Absent fields
    /// are skipped. Entries already in `list` are left untouched.
    pub fn to_conf_values(&self, list: &mut Vec<ConfValue>) {
        if let Some(v) = &self.require_explicit_policy {
            list.push(ConfValue::new(REQUIRE_EXPLICIT_POLICY_LABEL, v.to_string()));
        }
        if let Some(v) = &self.inhibit_policy_mapping {
            list.push(ConfValue::new(INHIBIT_POLICY_MAPPING_LABEL, v.to_string()));
        }
    }

    /// Build the extension from configuration values.
    ///
    /// Recognized names are `requireExplicitPolicy` and `inhibitPolicyMapping` (case-sensitive),
    /// with unsigned decimal values. If a name appears several times, the last value is used.
    /// Processing stops at the first invalid entry, which is returned in the error.
    ///
    /// ```rust
    /// use x509_policy_constraints::conf::ConfValue;
    /// use x509_policy_constraints::extensions::{PolicyConstraints, SkipCerts};
    ///
    /// let pc = PolicyConstraints::from_conf_values(&[
    ///     ConfValue::new("inhibitPolicyMapping", "2"),
    /// ]).unwrap();
    /// assert_eq!(pc.require_explicit_policy(), None);
    /// assert_eq!(pc.inhibit_policy_mapping(), Some(&SkipCerts::from(2u32)));
    /// ```
    pub fn from_conf_values(values: &[ConfValue]) -> Result<Self, ConfError> {
        let mut require_explicit_policy = None;
        let mut inhibit_policy_mapping = None;
        for val in values {
            match val.name.as_str() {
                REQUIRE_EXPLICIT_POLICY => {
                    require_explicit_policy = Some(get_value_skip_certs(val)?);
                }
                INHIBIT_POLICY_MAPPING => {
                    inhibit_policy_mapping = Some(get_value_skip_certs(val)?);
                }
                _ => {
                    debug!("policyConstraints: invalid name ({})", val);
                    return Err(ConfError::UnknownAttribute(val.clone()));
                }
            }
        }
        PolicyConstraints::new(require_explicit_policy, inhibit_policy_mapping)
            .map_err(|_| ConfError::EmptyExtension)
    }

    // present fields, with their context-specific tag
    fn fields(&self) -> impl Iterator<Item = (u32, &SkipCerts)> + '_ {
        let require = self.require_explicit_policy.as_ref().map(|v| (0, v));
        let inhibit = self.inhibit_policy_mapping.as_ref().map(|v| (1, v));
        require.into_iter().chain(inhibit)
    }

    fn content_len(&self) -> asn1_rs::Result<usize> {
        self.fields()
            .map(|(tag, value)| tagged_skip_certs_len(tag, value))
            .sum()
    }
}

impl<'a> FromDer<'a, X509Error> for PolicyConstraints {
    fn from_der(i: &'a [u8]) -> X509Result<'a, Self> {
        parse_policyconstraints(i)
    }
}

impl Tagged for PolicyConstraints {
    const TAG: Tag = Tag::Sequence;
}

impl ToDer for PolicyConstraints {
    fn to_der_len(&self) -> asn1_rs::Result<usize> {
        let sz = self.content_len()?;
        let header = Header::new(Class::Universal, true, Self::TAG, Length::Definite(sz));
        Ok(header.to_der_len()? + sz)
    }

    fn write_der_header(&self, writer: &mut dyn Write) -> SerializeResult<usize> {
        let sz = self.content_len()?;
        let header = Header::new(Class::Universal, true, Self::TAG, Length::Definite(sz));
        header.write_der_header(writer)
    }

    fn write_der_content(&self, writer: &mut dyn Write) -> SerializeResult<usize> {
        let mut sz = 0;
        for (tag, value) in self.fields() {
            let field = encode_tagged_skip_certs(tag, value)?;
            writer.write_all(&field)?;
            sz += field.len();
        }
        Ok(sz)
    }
}

// PolicyConstraints ::= SEQUENCE {
//     requireExplicitPolicy   [0] IMPLICIT SkipCerts OPTIONAL,
//     inhibitPolicyMapping    [1] IMPLICIT SkipCerts OPTIONAL }
pub(crate) fn parse_policyconstraints(i: &[u8]) -> X509Result<PolicyConstraints> {
    let (rem, pc) = Sequence::from_der_and_then(i, |input| {
        let (i, require_explicit_policy) = parse_opt_tagged_skip_certs(0, input)?;
        let (i, inhibit_policy_mapping) = parse_opt_tagged_skip_certs(1, i)?;
        // unknown, duplicate or misordered fields
        if !i.is_empty() {
            return Err(Err::Error(X509Error::InvalidPolicyConstraints));
        }
        let pc = PolicyConstraints::new(require_explicit_policy, inhibit_policy_mapping)
            .map_err(Err::Error)?;
        Ok((i, pc))
    })?;
    // fields are canonical at this point, so only the sequence header can differ
    let der_len = pc.to_der_len().map_err(|e| Err::Error(e.into()))?;
    if i.len() - rem.len() != der_len {
        return Err(Err::Error(X509Error::InvalidPolicyConstraints));
    }
    Ok((rem, pc))
}
