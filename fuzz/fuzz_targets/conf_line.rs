#![no_main]
use libfuzzer_sys::fuzz_target;
use x509_policy_constraints::extensions::build_extension;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = build_extension("policyConstraints", line);
    }
});
