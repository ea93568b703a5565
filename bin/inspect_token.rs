use miette::{IntoDiagnostic, miette};
use std::env;

fn main() -> miette::Result<()> {
    let token = env::args()
        .nth(1)
        .ok_or_else(|| miette!("Missing argument! Pass a Tl-Signature value"))?;

    let header = match tl_signature::extract_jws_header(&token) {
        Ok(header) => header,
        Err(err) => return Err(miette::Error::new(err).with_source_code(token)),
    };

    println!("{}", serde_json::to_string_pretty(&header).into_diagnostic()?);
    println!("(unverified, the signature hasn't been checked)");

    Ok(())
}
