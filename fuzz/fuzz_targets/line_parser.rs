#![no_main]

use hllog_core::pipeline::Callbacks;
use hllog_core::types::{EventEntry, UnknownEntry};
use hllog_pipeline::{EventRegistry, LogLineParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let registry = EventRegistry::new()
        .with_event("say", r#""{player}" say {string}"#)
        .and_then(|r| r.with_event("kill", r#""{attacker}" killed "{victim}" with {string}"#));
    let Ok(registry) = registry else {
        return;
    };

    // 어떤 바이트열이든 패닉 없이 처리되어야 한다
    let sink = Callbacks::new(|_: &EventEntry| {}, |_: &UnknownEntry| {});
    let mut parser = LogLineParser::new(registry, sink);
    parser.parse_bytes(data);
});
