//! `svcb archs`: list recognized architecture identifiers.

use anyhow::Result;
use svcb_spec::{Schema, ANY_ARCHITECTURE};

pub fn run(schema: &Schema) -> Result<()> {
    println!("Architectures (schema version {}):", schema.version());
    for arch in schema.architectures()? {
        println!("  {arch}");
    }
    println!();
    println!("Use '{ANY_ARCHITECTURE}' in a specification to build for whichever one the compiler targets.");
    Ok(())
}
