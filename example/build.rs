use std::{env, fs, path::PathBuf};

use brine_idl_compiler::{compile_schema_to, Language};

fn main() {
    let schema = "schema/people.idl";
    println!("cargo:rerun-if-changed={}", schema);

    let text = fs::read_to_string(schema).expect("failed to read schema");
    let code = match compile_schema_to(Language::Rust, &text) {
        Ok(code) => code,
        Err(e) => panic!("{}: {}", schema, e),
    };

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set")).join("people.rs");
    fs::write(&out, code).expect("failed to write generated code");
}
