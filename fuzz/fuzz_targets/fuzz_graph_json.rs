// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fuzz target for graph document decoding.
//!
//! Arbitrary bytes must either be rejected or decode into a graph whose
//! indices are dense and whose edges stay inside the node range.

#![no_main]

use castgraph::prelude::*;
use castgraph::store::{self, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = store::decode::<Spell>(text, Format::Json) else {
        return;
    };

    for (i, node) in graph.nodes().iter().enumerate() {
        assert_eq!(node.index(), i);
    }
    for edge in graph.edges() {
        assert!(edge.source < graph.len() && edge.target < graph.len());
        assert_ne!(edge.weight, NO_EDGE);
    }

    // Re-encoding an accepted graph must succeed and decode to the same edges
    let again = store::encode(&graph, Format::Json).expect("re-encode");
    let back: Graph<Spell> = store::decode(&again, Format::Json).expect("re-decode");
    assert_eq!(back.edges().collect::<Vec<_>>(), graph.edges().collect::<Vec<_>>());
});
