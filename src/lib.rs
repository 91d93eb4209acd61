//! [![License: MIT](https://img.shields.io/badge/License-MIT-yellow.svg)](./LICENSE-MIT)
//! [![Apache License 2.0](https://img.shields.io/badge/License-Apache%202.0-blue.svg)](./LICENSE-APACHE)
//!
//! # X.509 Policy Constraints
//!
//! An encoder/decoder for the X.509 v3 ([RFC5280]) "Policy Constraints" extension, built on
//! the [asn1-rs](https://github.com/rusticata/asn1-rs) parser framework.
//!
//! The extension is handled in two representations:
//!
//! - the binary (DER) value, as found in the `extnValue` field of certificates. See
//!   [`PolicyConstraints`](extensions::PolicyConstraints), which implements `FromDer` and
//!   `ToDer`;
//! - the configuration text form used by certificate generation tools, for example
//!   `requireExplicitPolicy:1,inhibitPolicyMapping:0`. See the [`conf`] module.
//!
//! Extensions are registered by OID in a static registry (see
//! [`find_method`](extensions::find_method)), which is used to decode, encode, print and build
//! extensions without knowing their type in advance.
//!
//! # Examples
//!
//! Decoding an extension value and printing it:
//!
//! ```rust
//! use x509_policy_constraints::extensions::*;
//! use x509_policy_constraints::oid_registry::OID_X509_EXT_POLICY_CONSTRAINTS;
//!
//! static DER: &[u8] = &[0x30, 0x06, 0x80, 0x01, 0x00, 0x81, 0x01, 0x02];
//!
//! # fn main() {
//! let res = parse_extension_value(&OID_X509_EXT_POLICY_CONSTRAINTS, DER);
//! match res {
//!     Ok(ParsedExtension::PolicyConstraints(pc)) => {
//!         assert_eq!(pc.require_explicit_policy(), Some(&SkipCerts::from(0u32)));
//!         let mut values = Vec::new();
//!         pc.to_conf_values(&mut values);
//!         for v in &values {
//!             println!("{}: {:?}", v.name, v.value);
//!         }
//!     },
//!     _ => panic!("extension parsing failed: {:?}", res),
//! }
//! # }
//! ```
//!
//! Building an extension from configuration text:
//!
//! ```rust
//! use x509_policy_constraints::extensions::build_extension;
//!
//! let ext = build_extension("policyConstraints", "critical,requireExplicitPolicy:1").unwrap();
//! assert!(ext.critical);
//! assert_eq!(ext.value, vec![0x30, 0x03, 0x80, 0x01, 0x01]);
//! ```
//!
//! [RFC5280]: https://tools.ietf.org/html/rfc5280

#![deny(/*missing_docs,*/
        unstable_features,
        unused_import_braces, unused_qualifications)]
#![warn(
    missing_debug_implementations,
    /* missing_docs,
    rust_2018_idioms,*/
    unreachable_pub
)]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod conf;
pub mod error;
pub mod extensions;
pub mod validate;

pub use asn1_rs;
pub use oid_registry;

pub mod prelude {
    pub use crate::conf::*;
    pub use crate::error::*;
    pub use crate::extensions::*;
    pub use crate::validate::*;

    pub use asn1_rs::{FromDer, ToDer};
    pub use oid_registry::*;
}
