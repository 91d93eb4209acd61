#![no_main]
use libfuzzer_sys::fuzz_target;
use x509_policy_constraints::prelude::*;

fuzz_target!(|data: &[u8]| {
    if let Ok((_, pc)) = PolicyConstraints::from_der(data) {
        let der = pc.to_der_vec().expect("re-encoding a decoded value");
        let (_, pc2) = PolicyConstraints::from_der(&der).expect("decoding a re-encoded value");
        assert_eq!(pc, pc2);
    }
});
