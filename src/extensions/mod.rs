//! X.509 Extensions objects and types

use crate::conf::{parse_conf_list, ConfValue};
use crate::error::{ConfError, X509Error};

use data_encoding::HEXUPPER;
use log::{debug, trace};
use oid_registry::*;
use std::fmt;

mod policy_constraints;
mod skip_certs;

pub use policy_constraints::{
    PolicyConstraints, INHIBIT_POLICY_MAPPING, INHIBIT_POLICY_MAPPING_LABEL,
    REQUIRE_EXPLICIT_POLICY, REQUIRE_EXPLICIT_POLICY_LABEL,
};
pub use skip_certs::SkipCerts;

/// X.509 version 3 extension
///
/// Each extension includes an OID and an ASN.1 structure.  When an extension appears in a
/// certificate, the OID appears as the field extnID and the corresponding ASN.1 encoded structure
/// is the value of the octet string extnValue.
///
/// This object owns the raw (DER-encoded) value. Use
/// [`X509Extension::parsed_extension()`] to decode it, if the extension is known.
///
/// <pre>
/// Extension  ::=  SEQUENCE  {
///     extnID      OBJECT IDENTIFIER,
///     critical    BOOLEAN DEFAULT FALSE,
///     extnValue   OCTET STRING  }
/// </pre>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct X509Extension {
    /// OID describing the extension content
    pub oid: Oid<'static>,
    /// Boolean value describing the 'critical' attribute of the extension
    pub critical: bool,
    /// Raw content of the extension
    pub value: Vec<u8>,
}

impl X509Extension {
    /// Creates a new extension with the provided values.
    #[inline]
    pub const fn new(oid: Oid<'static>, critical: bool, value: Vec<u8>) -> X509Extension {
        X509Extension {
            oid,
            critical,
            value,
        }
    }

    /// Decode the extension value
    ///
    /// Returns `UnsupportedExtension` if the extension is not implemented.
    pub fn parsed_extension(&self) -> Result<ParsedExtension, X509Error> {
        parse_extension_value(&self.oid, &self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParsedExtension {
    /// Crate parser does not support this extension (yet)
    UnsupportedExtension { oid: Oid<'static> },
    /// Section 4.2.1.11 of rfc 5280
    PolicyConstraints(PolicyConstraints),
}

impl ParsedExtension {
    /// Return `true` if the extension is unsupported
    pub fn unsupported(&self) -> bool {
        matches!(self, &ParsedExtension::UnsupportedExtension { .. })
    }

    /// Return the OID of this extension type
    pub fn oid(&self) -> Oid<'static> {
        match self {
            ParsedExtension::UnsupportedExtension { oid } => oid.clone(),
            ParsedExtension::PolicyConstraints(_) => OID_X509_EXT_POLICY_CONSTRAINTS,
        }
    }
}

pub type ExtDecoder = fn(&[u8]) -> Result<ParsedExtension, X509Error>;
pub type ExtEncoder = fn(&ParsedExtension) -> Result<Vec<u8>, X509Error>;
pub type ExtToValues = fn(&ParsedExtension, &mut Vec<ConfValue>);
pub type ExtFromValues = fn(&[ConfValue]) -> Result<ParsedExtension, ConfError>;
pub type ExtToString = fn(&ParsedExtension) -> String;
pub type ExtFromString = fn(&str) -> Result<ParsedExtension, ConfError>;

/// Codec of an extension type, as stored in the extensions registry
///
/// `decode` and `encode` convert between the DER value and [`ParsedExtension`]. The text
/// functions are optional: when an extension has no single-string form (`to_string`,
/// `from_string`), callers fall back to lists of [`ConfValue`] (`to_values`, `from_values`).
#[derive(Clone)]
pub struct ExtensionMethod {
    pub oid: Oid<'static>,
    pub short_name: &'static str,
    pub long_name: &'static str,
    pub decode: ExtDecoder,
    pub encode: ExtEncoder,
    pub to_values: Option<ExtToValues>,
    pub from_values: Option<ExtFromValues>,
    pub to_string: Option<ExtToString>,
    pub from_string: Option<ExtFromString>,
}

impl fmt::Debug for ExtensionMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ExtensionMethod")
            .field("oid", &self.oid)
            .field("short_name", &self.short_name)
            .field("long_name", &self.long_name)
            .field("to_values", &self.to_values.is_some())
            .field("from_values", &self.from_values.is_some())
            .field("to_string", &self.to_string.is_some())
            .field("from_string", &self.from_string.is_some())
            .finish()
    }
}

pub(crate) mod registry {
    use crate::extensions::*;
    use asn1_rs::{FromDer, ToDer};
    use lazy_static::lazy_static;
    use std::collections::HashMap;

    lazy_static! {
        pub(crate) static ref EXTENSION_METHODS: HashMap<Oid<'static>, ExtensionMethod> = {
            macro_rules! add {
                ($m:ident, $method:expr) => {
                    let method = $method;
                    $m.insert(method.oid.clone(), method);
                };
            }

            let mut m = HashMap::new();
            add!(
                m,
                ExtensionMethod {
                    oid: OID_X509_EXT_POLICY_CONSTRAINTS,
                    short_name: "policyConstraints",
                    long_name: "X509v3 Policy Constraints",
                    decode: decode_policyconstraints_ext,
                    encode: encode_policyconstraints_ext,
                    to_values: Some(policyconstraints_to_values),
                    from_values: Some(policyconstraints_from_values),
                    to_string: None,
                    from_string: None,
                }
            );
            m
        };
    }

    fn decode_policyconstraints_ext(i: &[u8]) -> Result<ParsedExtension, X509Error> {
        let (rem, pc) = PolicyConstraints::from_der(i)?;
        if !rem.is_empty() {
            return Err(X509Error::InvalidExtensions);
        }
        Ok(ParsedExtension::PolicyConstraints(pc))
    }

    fn encode_policyconstraints_ext(ext: &ParsedExtension) -> Result<Vec<u8>, X509Error> {
        match ext {
            ParsedExtension::PolicyConstraints(pc) => Ok(pc.to_der_vec()?),
            _ => Err(X509Error::InvalidExtensions),
        }
    }

    fn policyconstraints_to_values(ext: &ParsedExtension, list: &mut Vec<ConfValue>) {
        if let ParsedExtension::PolicyConstraints(pc) = ext {
            pc.to_conf_values(list);
        }
    }

    fn policyconstraints_from_values(values: &[ConfValue]) -> Result<ParsedExtension, ConfError> {
        PolicyConstraints::from_conf_values(values).map(ParsedExtension::PolicyConstraints)
    }
}

/// Look for the codec of the extension with this OID
pub fn find_method(oid: &Oid) -> Option<&'static ExtensionMethod> {
    registry::EXTENSION_METHODS.get(&oid.to_owned())
}

/// Look for the codec of an extension, given its short name (ex: `policyConstraints`), long name
/// (ex: `X509v3 Policy Constraints`) or OID in dotted form (ex: `2.5.29.36`)
pub fn find_method_by_name(name: &str) -> Option<&'static ExtensionMethod> {
    registry::EXTENSION_METHODS
        .values()
        .find(|m| m.short_name == name || m.long_name == name)
        .or_else(|| {
            name.parse::<Oid<'static>>()
                .ok()
                .and_then(|oid| find_method(&oid))
        })
}

/// Decode the DER value of an extension
///
/// If the extension is not known, return `UnsupportedExtension`.
pub fn parse_extension_value(oid: &Oid, value: &[u8]) -> Result<ParsedExtension, X509Error> {
    match find_method(oid) {
        Some(method) => {
            trace!("decoding {} ({} bytes)", method.short_name, value.len());
            (method.decode)(value)
        }
        None => Ok(ParsedExtension::UnsupportedExtension {
            oid: oid.to_owned(),
        }),
    }
}

/// Encode a parsed extension to its DER value
pub fn encode_extension_value(ext: &ParsedExtension) -> Result<Vec<u8>, X509Error> {
    match find_method(&ext.oid()) {
        Some(method) => (method.encode)(ext),
        None => Err(X509Error::InvalidExtensions),
    }
}

/// Append the human-readable form of a parsed extension to `list`
///
/// Returns `false` (and leaves `list` untouched) if the extension has no such form.
pub fn extension_to_conf_values(ext: &ParsedExtension, list: &mut Vec<ConfValue>) -> bool {
    match find_method(&ext.oid()).and_then(|m| m.to_values) {
        Some(to_values) => {
            to_values(ext, list);
            true
        }
        None => false,
    }
}

// a value prefixed by "critical," marks the extension as critical
fn check_critical(value: &str) -> (bool, &str) {
    match value.strip_prefix("critical,") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, value),
    }
}

/// Build an extension from its configuration line
///
/// `name` is the short name, long name or dotted OID of the extension. `value` is the
/// configuration line, optionally prefixed by `critical,`.
///
/// ```rust
/// use x509_policy_constraints::extensions::build_extension;
///
/// let ext = build_extension("policyConstraints", "critical,requireExplicitPolicy:0").unwrap();
/// assert!(ext.critical);
/// assert_eq!(ext.value, vec![0x30, 0x03, 0x80, 0x01, 0x00]);
/// ```
pub fn build_extension(name: &str, value: &str) -> Result<X509Extension, ConfError> {
    let method = find_method_by_name(name).ok_or_else(|| {
        debug!("unknown extension name '{}'", name);
        ConfError::UnknownExtension(name.to_owned())
    })?;
    let (critical, value) = check_critical(value);
    let parsed = if let Some(from_string) = method.from_string {
        from_string(value)?
    } else if let Some(from_values) = method.from_values {
        let values = parse_conf_list(value)?;
        from_values(&values)?
    } else {
        return Err(ConfError::Unsupported(method.short_name.to_owned()));
    };
    let der = (method.encode)(&parsed)?;
    Ok(X509Extension::new(method.oid.clone(), critical, der))
}

fn format_conf_values(values: &[ConfValue], indent: usize) -> String {
    values
        .iter()
        .map(|v| match v.value() {
            Some(value) => format!("{:indent$}{}:{}", "", v.name, value, indent = indent),
            None => format!("{:indent$}{}", "", v.name, indent = indent),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_hex_dump(bytes: &[u8], indent: usize) -> String {
    if bytes.is_empty() {
        return format!("{:indent$}<EMPTY>", "", indent = indent);
    }
    let hex = bytes
        .iter()
        .map(|b| HEXUPPER.encode(&[*b]))
        .collect::<Vec<_>>()
        .join(":");
    format!("{:indent$}{}", "", hex, indent = indent)
}

/// Format the extension value for display
///
/// Known extensions are decoded and printed using their text form, one `name:value` entry per
/// line. Unknown extensions, and values that cannot be decoded, are printed as a hex dump.
pub fn print_extension(ext: &X509Extension, indent: usize) -> String {
    let method = match find_method(&ext.oid) {
        Some(method) => method,
        None => return format_hex_dump(&ext.value, indent),
    };
    let parsed = match (method.decode)(&ext.value) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("{}: could not decode value: {}", method.short_name, e);
            return format_hex_dump(&ext.value, indent);
        }
    };
    if let Some(to_string) = method.to_string {
        format!("{:indent$}{}", "", to_string(&parsed), indent = indent)
    } else if let Some(to_values) = method.to_values {
        let mut values = Vec::new();
        to_values(&parsed, &mut values);
        format_conf_values(&values, indent)
    } else {
        format_hex_dump(&ext.value, indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asn1_rs::oid;
    use hex_literal::hex;

    #[test]
    fn test_registry_lookup() {
        let method = find_method(&OID_X509_EXT_POLICY_CONSTRAINTS).expect("policyConstraints");
        assert_eq!(method.short_name, "policyConstraints");
        assert!(method.to_values.is_some());
        assert!(method.from_values.is_some());
        assert!(method.to_string.is_none());
        assert!(method.from_string.is_none());

        for name in &["policyConstraints", "X509v3 Policy Constraints", "2.5.29.36"] {
            let m = find_method_by_name(name).expect("find_method_by_name");
            assert_eq!(m.oid, OID_X509_EXT_POLICY_CONSTRAINTS);
        }
        assert!(find_method_by_name("PolicyConstraints").is_none());
        assert!(find_method_by_name("1.2.3.4").is_none());
        assert!(find_method(&oid!(2.5.29.19)).is_none());
    }

    #[test]
    fn test_parse_extension_value() {
        let res = parse_extension_value(&OID_X509_EXT_POLICY_CONSTRAINTS, &hex!("30 03 81 01 0a"))
            .expect("parse_extension_value");
        assert!(!res.unsupported());
        assert_eq!(res.oid(), OID_X509_EXT_POLICY_CONSTRAINTS);
        if let ParsedExtension::PolicyConstraints(pc) = &res {
            assert_eq!(pc.inhibit_policy_mapping(), Some(&SkipCerts::from(10u32)));
        } else {
            panic!("Extension has wrong type");
        }

        // the value must be fully consumed
        assert_eq!(
            parse_extension_value(&OID_X509_EXT_POLICY_CONSTRAINTS, &hex!("30 03 81 01 0a 00")),
            Err(X509Error::InvalidExtensions)
        );

        let res = parse_extension_value(&oid!(1.2.3.4), &hex!("05 00")).expect("unsupported");
        assert!(res.unsupported());
        assert_eq!(res.oid(), oid!(1.2.3.4));
    }

    #[test]
    fn test_encode_extension_value() {
        let pc = PolicyConstraints::new(Some(SkipCerts::from(2u32)), None).expect("new");
        let der = encode_extension_value(&ParsedExtension::PolicyConstraints(pc))
            .expect("encode_extension_value");
        assert_eq!(der, hex!("30 03 80 01 02"));

        let unsupported = ParsedExtension::UnsupportedExtension { oid: oid!(1.2.3.4) };
        assert_eq!(
            encode_extension_value(&unsupported),
            Err(X509Error::InvalidExtensions)
        );
    }

    #[test]
    fn test_check_critical() {
        assert_eq!(check_critical("critical,  a:1"), (true, "a:1"));
        assert_eq!(check_critical("a:1"), (false, "a:1"));
        assert_eq!(check_critical("critical"), (false, "critical"));
    }

    #[test]
    fn test_print_extension() {
        let ext = X509Extension::new(
            OID_X509_EXT_POLICY_CONSTRAINTS,
            true,
            hex!("30 06 80 01 00 81 01 05").to_vec(),
        );
        assert_eq!(
            print_extension(&ext, 4),
            "    Require Explicit Policy:0\n    Inhibit Policy Mapping:5"
        );

        // invalid value
        let ext = X509Extension::new(OID_X509_EXT_POLICY_CONSTRAINTS, true, hex!("30 00").to_vec());
        assert_eq!(print_extension(&ext, 2), "  30:00");

        // unknown extension
        let ext = X509Extension::new(oid!(1.2.3.4), false, hex!("0c 02 41 42").to_vec());
        assert_eq!(print_extension(&ext, 0), "0C:02:41:42");
        let ext = X509Extension::new(oid!(1.2.3.4), false, Vec::new());
        assert_eq!(print_extension(&ext, 0), "<EMPTY>");
    }
}
