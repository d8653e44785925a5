#![no_main]
use libfuzzer_sys::fuzz_target;

use fridge_traits::EventSource;
use fridge_transport::{LineSource, TopicCodec};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bus text through the decoder and the analyzer.
    let mut source = LineSource::new(data, TopicCodec::default());
    let Ok(mut analyzer) = fridge_core::FridgeAnalyzer::builder().try_build() else {
        return;
    };
    let mut out = Vec::new();
    while let Ok(Some(ev)) = source.next_event() {
        analyzer.ingest(ev);
        let _ = analyzer.flush(&mut out, 4);
    }
    let _ = analyzer.flush_all(&mut out);
    assert_eq!(analyzer.pending(), 0);
});
