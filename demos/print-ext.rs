use data_encoding::HEXLOWER_PERMISSIVE;
use std::env;
use std::io;
use x509_policy_constraints::prelude::*;

fn usage() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "usage: print-ext (--der HEX | --conf LINE)",
    )
}

fn print_ext(ext: &X509Extension) {
    let name = match find_method(&ext.oid) {
        Some(method) => method.long_name.to_owned(),
        None => format!("{}", ext.oid),
    };
    println!("    [crit:{} l:{}] {}: ", ext.critical, ext.value.len(), name);
    println!("{}", print_extension(ext, 6));
    let (ok, warnings, errors) = ext.validate_to_vec();
    for warning in &warnings {
        println!("      [W] {}", warning);
    }
    for error in &errors {
        println!("      [E] {}", error);
    }
    if ok {
        println!("      <structure is valid>");
    }
}

pub fn main() -> io::Result<()> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let (mode, input) = match (args.next(), args.next()) {
        (Some(mode), Some(input)) => (mode, input),
        _ => return Err(usage()),
    };
    let ext = match mode.as_str() {
        "--der" => {
            let hex: String = input.chars().filter(|c| !c.is_whitespace() && *c != ':').collect();
            let value = HEXLOWER_PERMISSIVE
                .decode(hex.as_bytes())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            X509Extension::new(OID_X509_EXT_POLICY_CONSTRAINTS, true, value)
        }
        "--conf" => build_extension("policyConstraints", &input)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
        _ => return Err(usage()),
    };
    print_ext(&ext);
    Ok(())
}
