#![no_main]

use arbitrary::Arbitrary;
use hllog_pipeline::EventRegistry;
use libfuzzer_sys::fuzz_target;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 이벤트 패턴 (토큰 포함 가능)
    pattern: String,
    /// 매칭 대상 본문
    remainder: String,
}

fuzz_target!(|input: FuzzInput| {
    // 패턴 길이 제한 (성능)
    if input.pattern.len() > 256 {
        return;
    }

    let mut registry = EventRegistry::new();
    if registry.register("fuzz", &input.pattern).is_err() {
        return;
    }

    if let Some(matched) = registry.match_line(&input.remainder) {
        assert_eq!(matched.name, "fuzz");
    }
});
