#![allow(missing_docs)]

//! Decodes a typed configuration with hand-written recursive-descent code,
//! the way the lookahead parser is meant to be used.

use lookahead_json::{JsonType, LookaheadError, LookaheadParser, ParserOptions, State};

const PIPELINE: &str = r#"
{
    "name": "nightly-resnet",
    "version": 3,
    "stages": [
        {
            "kind": "load",
            "path": "/data/imagenet",
            "shuffle": true
        },
        {
            "kind": "train",
            "epochs": 90,
            "learning_rate": 0.1,
            "layers": [64, 128, 256, 512],
            "notes": null
        },
        {
            "kind": "export",
            "path": "/models/resnet.onnx",
            "unknown_option": {"nested": [1, {"deep": [[]]}]}
        }
    ],
    "annotations": {"owner": "ml-infra", "ticket": "ML-4412"},
    "seed": -17
}
"#;

#[derive(Debug, Default, PartialEq)]
struct Pipeline {
    name: String,
    version: u64,
    stages: Vec<Stage>,
    seed: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Stage {
    Load { path: String, shuffle: bool },
    Train { epochs: i32, learning_rate: f64, layers: Vec<i32> },
    Export { path: String },
}

#[derive(Debug, Default)]
struct StageFields {
    kind: String,
    path: String,
    shuffle: bool,
    epochs: i32,
    learning_rate: f64,
    layers: Vec<i32>,
}

#[derive(Debug)]
enum DecodeError {
    Parser(LookaheadError),
    UnknownStage(String),
    Missing(&'static str),
}

fn check(p: &LookaheadParser<'_>) -> Result<(), DecodeError> {
    match p.error() {
        Some(error) => Err(DecodeError::Parser(*error)),
        None => Ok(()),
    }
}

fn decode_stage(p: &mut LookaheadParser<'_>) -> Result<Stage, DecodeError> {
    let mut f = StageFields::default();
    p.enter_object();
    while let Some(key) = p.next_object_key() {
        match key {
            "kind" => f.kind = p.get_string().unwrap_or_default().to_owned(),
            "path" => f.path = p.get_string().unwrap_or_default().to_owned(),
            "shuffle" => f.shuffle = p.get_bool().unwrap_or_default(),
            "epochs" => f.epochs = p.get_int().unwrap_or_default(),
            "learning_rate" => f.learning_rate = p.get_double().unwrap_or_default(),
            "layers" => {
                p.enter_array();
                while p.next_array_value() {
                    f.layers.extend(p.get_int());
                }
            }
            _ => p.skip_value(),
        }
    }
    check(p)?;

    match f.kind.as_str() {
        "load" => Ok(Stage::Load {
            path: f.path,
            shuffle: f.shuffle,
        }),
        "train" => Ok(Stage::Train {
            epochs: f.epochs,
            learning_rate: f.learning_rate,
            layers: f.layers,
        }),
        "export" => Ok(Stage::Export { path: f.path }),
        _ => Err(DecodeError::UnknownStage(f.kind)),
    }
}

fn decode_pipeline(json: &str) -> Result<Pipeline, DecodeError> {
    let mut buf = json.as_bytes().to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    let mut pipeline = Pipeline::default();
    let mut version = None;

    p.enter_object();
    while let Some(key) = p.next_object_key() {
        match key {
            "name" => pipeline.name = p.get_string().unwrap_or_default().to_owned(),
            "version" => version = p.get_u64(),
            "seed" => pipeline.seed = p.get_i64(),
            "stages" => {
                p.enter_array();
                while p.next_array_value() {
                    pipeline.stages.push(decode_stage(&mut p)?);
                }
            }
            _ => p.skip_value(),
        }
    }
    check(&p)?;
    pipeline.version = version.ok_or(DecodeError::Missing("version"))?;
    Ok(pipeline)
}

#[test]
fn decodes_the_whole_pipeline() {
    let pipeline = decode_pipeline(PIPELINE).unwrap();
    assert_eq!(
        pipeline,
        Pipeline {
            name: "nightly-resnet".to_owned(),
            version: 3,
            stages: vec![
                Stage::Load {
                    path: "/data/imagenet".to_owned(),
                    shuffle: true,
                },
                Stage::Train {
                    epochs: 90,
                    learning_rate: 0.1,
                    layers: vec![64, 128, 256, 512],
                },
                Stage::Export {
                    path: "/models/resnet.onnx".to_owned(),
                },
            ],
            seed: Some(-17),
        }
    );
}

#[test]
fn wrong_types_surface_as_parser_errors() {
    let json = PIPELINE.replace(r#""epochs": 90"#, r#""epochs": "ninety""#);
    match decode_pipeline(&json) {
        Err(DecodeError::Parser(LookaheadError::TypeMismatch { found, .. })) => {
            assert_eq!(found, State::HasString);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn syntax_errors_surface_as_parser_errors() {
    let json = PIPELINE.replace(r#""shuffle": true"#, r#""shuffle": tru"#);
    match decode_pipeline(&json) {
        Err(DecodeError::Parser(LookaheadError::Syntax(error))) => {
            assert_eq!(error.line, 9);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn semantic_errors_are_the_caller_s() {
    let json = PIPELINE.replace(r#""kind": "export""#, r#""kind": "deploy""#);
    assert!(matches!(
        decode_pipeline(&json),
        Err(DecodeError::UnknownStage(kind)) if kind == "deploy"
    ));

    let json = PIPELINE.replace(r#""version": 3,"#, "");
    assert!(matches!(
        decode_pipeline(&json),
        Err(DecodeError::Missing("version"))
    ));
}

#[test]
fn peek_type_drives_dynamic_dispatch() {
    let mut buf = PIPELINE.as_bytes().to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    let mut seen = Vec::new();
    p.enter_object();
    while let Some(key) = p.next_object_key() {
        seen.push((key, p.peek_type()));
        p.skip_value();
    }
    assert!(p.is_valid());
    assert_eq!(
        seen,
        [
            ("name", Some(JsonType::String)),
            ("version", Some(JsonType::Number)),
            ("stages", Some(JsonType::Array)),
            ("annotations", Some(JsonType::Object)),
            ("seed", Some(JsonType::Number)),
        ]
    );
}

#[test]
fn a_prefix_can_be_read_from_a_longer_stream() {
    let stream = format!("{}\n{{\"next\": \"document\"}}", PIPELINE.trim());
    let mut buf = stream.into_bytes();
    let options = ParserOptions {
        stop_when_done: true,
        ..ParserOptions::default()
    };
    let mut p = LookaheadParser::with_options(&mut buf, options);
    p.skip_value();
    assert!(p.is_valid());
    assert_eq!(p.state(), State::Finished);
}
