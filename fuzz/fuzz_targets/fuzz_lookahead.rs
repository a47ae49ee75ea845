#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use lookahead_json::{JsonType, LookaheadParser, ParserOptions, State};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte navigation seed
const MAX_WALK_DEPTH: usize = 256;

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07); // 3 bits

        // navigation seed
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        let limit = max_size - prefix;
        prefix += append_value(&mut data[prefix..], size, limit);
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒N whitespace bytes (N chosen randomly) to `buf`, but never exceed
/// `limit`. Returns the number of bytes written.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n = rng.random_range(1..=limit.min(8));
        for b in &mut buf[..n] {
            *b = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);

    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Walks the value under the cursor, letting `rng` choose between reading,
/// peeking and skipping at every step. Subtrees deeper than `MAX_WALK_DEPTH`
/// are skipped to keep the stack bounded.
fn random_walk(p: &mut LookaheadParser<'_>, rng: &mut SmallRng, depth: usize) {
    if depth > MAX_WALK_DEPTH {
        p.skip_value();
        return;
    }
    match p.peek_type() {
        Some(JsonType::Object) => {
            if rng.random_ratio(1, 8) {
                p.skip_value();
                return;
            }
            p.enter_object();
            while let Some(_key) = p.next_object_key() {
                if rng.random_ratio(1, 16) {
                    p.skip_object();
                    return;
                }
                random_walk(p, rng, depth + 1);
            }
        }
        Some(JsonType::Array) => {
            if rng.random_ratio(1, 8) {
                p.skip_value();
                return;
            }
            p.enter_array();
            while p.next_array_value() {
                if rng.random_ratio(1, 16) {
                    p.skip_array();
                    return;
                }
                random_walk(p, rng, depth + 1);
            }
        }
        Some(JsonType::Null) => assert!(p.get_null()),
        Some(JsonType::Bool) => assert!(p.get_bool().is_some()),
        Some(JsonType::Number) => assert!(p.get_double().is_some()),
        Some(JsonType::String) => assert!(p.get_string().is_some()),
        None => {}
    }
}

/// Issues arbitrary, possibly ill-formed operations. The parser must never
/// panic, and once it fails it must stay failed.
fn random_ops(p: &mut LookaheadParser<'_>, rng: &mut SmallRng) {
    for _ in 0..64 {
        let was_valid = p.is_valid();
        match rng.random_range(0..12) {
            0 => _ = p.enter_object(),
            1 => _ = p.enter_array(),
            2 => _ = p.next_object_key(),
            3 => _ = p.next_array_value(),
            4 => _ = p.get_int(),
            5 => _ = p.get_double(),
            6 => _ = p.get_bool(),
            7 => _ = p.get_string(),
            8 => _ = p.get_null(),
            9 => p.skip_value(),
            10 => p.skip_object(),
            _ => _ = (p.peek_type(), p.peek_value()),
        }
        if !was_valid {
            assert_eq!(p.state(), State::Error);
        }
        assert_eq!(p.is_valid(), p.error().is_none());
    }
}

fn lookahead(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let nav_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];

    let options = ParserOptions {
        stop_when_done: flags & 1 != 0,
        max_depth: (flags & 2 != 0).then_some(64),
        numbers_as_raw: false,
    };
    let accepted = serde_json::from_slice::<Value>(data).is_ok();

    // Whatever serde_json accepts must be skipped cleanly in one call.
    let mut buf = data.to_vec();
    let mut p = LookaheadParser::with_options(&mut buf, options);
    p.skip_value();
    if accepted && options.max_depth.is_none() {
        assert!(p.is_valid(), "{:?}", p.error());
        assert_eq!(p.state(), State::Finished);
    }

    // A seeded walk over valid input reaches the end of the document.
    let mut rng = SmallRng::seed_from_u64(nav_seed);
    let mut buf = data.to_vec();
    let mut p = LookaheadParser::with_options(&mut buf, options);
    random_walk(&mut p, &mut rng, 0);
    if accepted && options.max_depth.is_none() {
        assert!(p.is_valid(), "{:?}", p.error());
        assert_eq!(p.state(), State::Finished);
    }

    if flags & 4 != 0 {
        let mut buf = data.to_vec();
        let mut p = LookaheadParser::with_options(&mut buf, options);
        random_ops(&mut p, &mut rng);
    }
}

fuzz_target!(|data: &[u8]| lookahead(data));
