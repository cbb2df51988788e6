#![no_main]
use bint::BigInt;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (lhs, rhs) = rest.split_at(split as usize % (rest.len() + 1));
    let a = BigInt::from_bytes_be(lhs);
    let b = -BigInt::from_bytes_be(rhs);

    if let Ok((q, r)) = a.div_rem(&b) {
        assert_eq!(&(&q * &b) + &r, a);
        assert!(r.cmp_abs(&b).is_lt());
    }
    assert_eq!(&(&a + &b) - &b, a);
    assert_eq!(!!(&a ^ &b), &a ^ &b);
});
