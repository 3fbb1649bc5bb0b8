// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Segment decoding under adversarial input.
//!
//! A segment file on disk can be truncated by a crash, flipped by bad
//! hardware, or replaced by something else entirely. The worst case should
//! be a storage error for that namespace, never a panic or a huge allocation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scour::binary::{decode_segment, encode_segment, read_header};
use scour::Namespace;

fuzz_target!(|data: &[u8]| {
    let Ok(namespace) = Namespace::new("fuzz") else {
        return;
    };

    // Header parsing alone must never panic either
    let _ = read_header(data);

    let Ok(snapshot) = decode_segment(namespace.clone(), data) else {
        return;
    };

    // Anything that decodes is well formed...
    assert!(snapshot.check_well_formed().is_ok());

    // ...and re-encodes to bytes that decode to the same state
    let bytes = encode_segment(&snapshot).expect("re-encode of decoded snapshot");
    let again = decode_segment(namespace, &bytes).expect("decode of re-encoded snapshot");
    assert_eq!(again.generation(), snapshot.generation());
    assert_eq!(again.documents(), snapshot.documents());
    assert_eq!(again.terms(), snapshot.terms());
});
