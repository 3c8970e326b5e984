#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lingo::{
    Dictionary, LanguageSettings, LookupRequest, RecordingDiagnostics, ResolveError, Resolver,
};
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    language: String,
    msgid: String,
    plural: Option<String>,
    context: Option<String>,
    count: i64,
    params: Vec<(String, String)>,
    disable_escaping: bool,
}

const DICTIONARY: &str = r#"{
    "fr_FR": {"Hello": ["Bonjour", "Bonjours"], "Bye": {"": "Au revoir", "formal": "Adieu"}},
    "de": {"Hello": "Hallo %{name}"},
    "ar": {"Hello": ["a", "b", "c", "d", "e", "f"]}
}"#;

fuzz_target!(|input: Input| {
    let Ok(dictionary) = Dictionary::from_json_str(DICTIONARY) else {
        return;
    };
    let sink = Arc::new(RecordingDiagnostics::new());
    let resolver = Resolver::new().with_diagnostics(sink.clone());
    let settings = LanguageSettings::new(input.language.as_str(), dictionary);

    let params: Vec<(&str, &str)> = input
        .params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let mut request = LookupRequest::new(&input.msgid)
        .count(input.count)
        .params(&params)
        .disable_escaping(input.disable_escaping);
    if let Some(plural) = &input.plural {
        request = request.plural(plural);
    }
    if let Some(context) = &input.context {
        request = request.context(context);
    }

    match resolver.resolve(&settings, &request) {
        Ok(_) => assert!(sink.messages().len() <= 1, "more than one warning per lookup"),
        // The fixed dictionary has every plural slot filled and a void
        // context wherever contexts are used.
        Err(err @ ResolveError::MalformedPluralData { .. })
        | Err(err @ ResolveError::MissingVoidContext { .. }) => {
            panic!("well-formed dictionary produced {err}")
        }
    }
});
