#![no_main]

use hllog_pipeline::collector::validate_datagram;
use hllog_pipeline::parser::strip_padding_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if validate_datagram(data).is_ok() {
        // 유효한 데이터그램은 마커와 트레일러를 모두 가진다
        assert!(data.len() >= 6);
        let _ = strip_padding_bytes(data);
    }
});
