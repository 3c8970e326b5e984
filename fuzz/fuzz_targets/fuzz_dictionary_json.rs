#![no_main]

use lingo::{Dictionary, LanguageSettings, LookupRequest, RecordingDiagnostics, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    // Cap length to keep fuzzing fast.
    if data.len() > 4096 {
        return;
    }
    let Ok(dictionary) = Dictionary::from_json_reader(data) else {
        return;
    };

    let report = dictionary.coverage_report();
    for lang in &report.languages {
        assert!(
            (0.0..=100.0).contains(&lang.coverage_percent),
            "coverage out of range: {}",
            lang.coverage_percent
        );
        assert!(lang.present + lang.missing.len() <= report.total_msgids);
    }

    // Every accepted entry must resolve without panicking.
    let sink = Arc::new(RecordingDiagnostics::new());
    let resolver = Resolver::new().with_diagnostics(sink);
    let msgids = dictionary.all_msgids();
    let languages: Vec<String> = dictionary.languages().into_iter().map(String::from).collect();
    let settings = LanguageSettings::new("en", dictionary);
    for language in &languages {
        for msgid in &msgids {
            for count in [0, 1, 2, 5, 11, 101] {
                let request = LookupRequest::new(msgid).language(language).count(count);
                let _ = resolver.resolve(&settings, &request);
            }
        }
    }
});
