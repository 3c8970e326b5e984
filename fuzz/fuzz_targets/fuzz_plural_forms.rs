#![no_main]

use libfuzzer_sys::fuzz_target;
use lingo_plural::PluralRule;

fuzz_target!(|data: &[u8]| {
    let Ok(header) = std::str::from_utf8(data) else {
        return;
    };
    // Long enough to reach the token and nesting limits.
    if header.len() > 1 << 16 {
        return;
    }

    // Parsing must never panic; accepted rules must stay in range.
    let Ok(rule) = PluralRule::from_plural_forms(header) else {
        return;
    };
    let forms = rule.form_count();
    for count in [i64::MIN, -1, 0, 1, 2, 3, 5, 11, 21, 100, 1_000_001, i64::MAX] {
        let index = rule.index(count);
        assert!(index < forms, "index {index} >= {forms} for count {count}");
    }
});
