//! Reads a training-pipeline configuration with schema-shaped
//! recursive-descent code instead of building a document tree.
//!
//! The configuration looks roughly like this (abridged):
//!
//! ```text
//! {
//!   "name":   string,
//!   "stages": [ { "kind": "load" | "train" | "export", ... } ],
//!   "seed":   integer
//! }
//! ```
//!
//! Unknown keys anywhere are skipped without being decoded, and the first
//! type or syntax error stops the walk. The report lists what was read.
//!
//! Run with
//!
//! ```bash
//! cargo run -p lookahead-json --example pipeline_config [path/to/pipeline.json]
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use std::fmt::Write;

use lookahead_json::{JsonType, LookaheadParser};

const BUILTIN: &str = r#"{
    "name": "nightly-resnet",
    "owner": {"team": "ml-infra", "oncall": ["ada", "grace"]},
    "stages": [
        {"kind": "load", "path": "/data/imagenet", "workers": 8},
        {"kind": "train", "epochs": 90, "learning_rate": 0.1, "layers": [64, 128, 256]},
        {"kind": "export", "path": "/models/resnet.onnx", "opset": 17}
    ],
    "seed": 7
}"#;

fn read_stage(p: &mut LookaheadParser<'_>, report: &mut String) {
    p.enter_object();
    while let Some(key) = p.next_object_key() {
        match (key, p.peek_type()) {
            ("kind", _) => {
                let kind = p.get_string().unwrap_or("?");
                writeln!(report, "  stage {kind}").unwrap();
            }
            ("path", _) => {
                let path = p.get_string().unwrap_or("?");
                writeln!(report, "    path   {path}").unwrap();
            }
            ("epochs", _) => {
                let epochs = p.get_int().unwrap_or_default();
                writeln!(report, "    epochs {epochs}").unwrap();
            }
            ("learning_rate", _) => {
                let lr = p.get_double().unwrap_or_default();
                writeln!(report, "    lr     {lr}").unwrap();
            }
            ("layers", Some(JsonType::Array)) => {
                let mut widths = Vec::new();
                p.enter_array();
                while p.next_array_value() {
                    widths.extend(p.get_int());
                }
                writeln!(report, "    layers {widths:?}").unwrap();
            }
            _ => p.skip_value(),
        }
    }
}

fn read_pipeline(json: &mut [u8]) -> String {
    let mut report = String::from("\n");
    let mut p = LookaheadParser::new(json);

    p.enter_object();
    while let Some(key) = p.next_object_key() {
        match key {
            "name" => {
                let name = p.get_string().unwrap_or("?");
                writeln!(report, "pipeline {name}").unwrap();
            }
            "seed" => {
                let seed = p.get_i64().unwrap_or_default();
                writeln!(report, "seed {seed}").unwrap();
            }
            "stages" => {
                p.enter_array();
                while p.next_array_value() {
                    read_stage(&mut p, &mut report);
                }
            }
            _ => p.skip_value(),
        }
    }

    match p.error() {
        None => writeln!(report, "ok").unwrap(),
        Some(error) => writeln!(report, "error: {error}").unwrap(),
    }
    report
}

fn main() {
    let path = std::env::args().nth(1);
    let mut buf = match &path {
        Some(path) => std::fs::read(path).unwrap_or_else(|e| {
            eprintln!("cannot read {path}: {e}");
            std::process::exit(1);
        }),
        None => BUILTIN.as_bytes().to_vec(),
    };

    let report = read_pipeline(&mut buf);
    print!("{report}");

    if path.is_none() {
        #[cfg(not(miri))]
        insta::assert_snapshot!(report, @r"
        pipeline nightly-resnet
          stage load
            path   /data/imagenet
          stage train
            epochs 90
            lr     0.1
            layers [64, 128, 256]
          stage export
            path   /models/resnet.onnx
        seed 7
        ok
        ");
    }
}
