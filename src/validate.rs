//! Structure validation of extensions

use crate::extensions::{find_method, X509Extension};
use oid_registry::OID_X509_EXT_POLICY_CONSTRAINTS;
use std::collections::HashSet;

/// Trait for validating item (for ex. validate X.509 structure)
///
/// # Examples
///
/// Collecting warnings and errors to `Vec`:
///
/// ```
/// use x509_policy_constraints::extensions::build_extension;
/// use x509_policy_constraints::validate::Validate;
///
/// let ext = build_extension("policyConstraints", "inhibitPolicyMapping:1").unwrap();
/// let (ok, warnings, errors) = ext.validate_to_vec();
/// assert!(ok);
/// for warning in &warnings {
///     eprintln!("  [W] {}", warning);
/// }
/// assert_eq!(warnings.len(), 1);
/// assert!(errors.is_empty());
/// ```
pub trait Validate {
    /// Attempts to validate current item.
    ///
    /// Returns `true` if item was validated.
    ///
    /// Call `warn()` if a non-fatal error was encountered, and `err()`
    /// if the error is fatal. These functions receive a description of the error.
    fn validate<W, E>(&self, warn: W, err: E) -> bool
    where
        W: FnMut(&str),
        E: FnMut(&str);

    /// Attempts to validate current item, storing warning and errors in `Vec`.
    ///
    /// Returns the validation result (`true` if validated), the list of warnings,
    /// and the list of errors.
    fn validate_to_vec(&self) -> (bool, Vec<String>, Vec<String>) {
        let mut warn_list = Vec::new();
        let mut err_list = Vec::new();
        let res = self.validate(
            |s| warn_list.push(s.to_owned()),
            |s| err_list.push(s.to_owned()),
        );
        (res, warn_list, err_list)
    }
}

impl Validate for X509Extension {
    fn validate<W, E>(&self, mut warn: W, mut err: E) -> bool
    where
        W: FnMut(&str),
        E: FnMut(&str),
    {
        // unknown extensions cannot be checked
        let method = match find_method(&self.oid) {
            Some(method) => method,
            None => return true,
        };
        if let Err(e) = (method.decode)(&self.value) {
            err(&format!("Invalid '{}' extension: {}", method.long_name, e));
            return false;
        }
        // RFC 5280 4.2.1.11
        if self.oid == OID_X509_EXT_POLICY_CONSTRAINTS && !self.critical {
            warn("Policy Constraints extension should be marked critical");
        }
        true
    }
}

impl Validate for [X509Extension] {
    fn validate<W, E>(&self, mut warn: W, mut err: E) -> bool
    where
        W: FnMut(&str),
        E: FnMut(&str),
    {
        let mut res = true;
        // check for duplicate extensions
        let mut m = HashSet::new();
        for ext in self.iter() {
            if !m.insert(&ext.oid) {
                err(&format!("Duplicate extension {}", ext.oid));
                res = false;
            }
            res &= ext.validate(&mut warn, &mut err);
        }
        res
    }
}
