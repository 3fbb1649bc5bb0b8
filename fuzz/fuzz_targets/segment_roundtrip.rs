// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary documents survive encode then decode unchanged.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scour::binary::{decode_segment, encode_segment};
use scour::testing::snapshot_of_docs;
use scour::Document;

#[derive(Arbitrary, Debug)]
struct FuzzDoc {
    key: String,
    url: String,
    title: Option<String>,
    content: String,
}

fuzz_target!(|docs: Vec<FuzzDoc>| {
    let snapshot = snapshot_of_docs(docs.into_iter().take(64).map(|d| Document {
        key: d.key,
        url: d.url,
        title: d.title,
        content: d.content,
    }));

    let bytes = encode_segment(&snapshot).expect("encode");
    let decoded = decode_segment(snapshot.namespace().clone(), &bytes).expect("decode");
    assert_eq!(decoded.documents(), snapshot.documents());
    assert_eq!(decoded.terms(), snapshot.terms());
});
