#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(value) = bint::BigInt::parse(text) {
        let decimal = value.to_string();
        assert_eq!(bint::BigInt::parse(&decimal).ok(), Some(value));
    }
});
