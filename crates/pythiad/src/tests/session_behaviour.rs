//! End-to-end sessions through the daemon loop, asserting exact wire bytes.

use pythia_engine::{CallSignature, CompletionCandidate, EngineError, ResolvedLocation};

use crate::config::ParamsMode;
use crate::server::{ShutdownCause, serve};
use crate::tests::support::MockEngine;

fn run_session(engine: &MockEngine, mode: ParamsMode, input: &str) -> String {
    let mut written = Vec::new();
    let cause = serve(input.as_bytes(), &mut written, engine, mode)
        .expect("session should stop cleanly");
    assert_eq!(cause, ShutdownCause::InputExhausted);
    String::from_utf8(written).expect("output should be UTF-8")
}

#[test]
fn autocomplete_answers_with_display_and_insertion_pairs() {
    let engine =
        MockEngine::new().with_completions(vec![CompletionCandidate::new("path", "module")]);
    let input = concat!(
        r#"{"type":"autocomplete","uuid":"1","source":"import os\nos.","line":2,"offset":3,"filename":"","encoding":"utf-8"}"#,
        "\n",
    );

    let written = run_session(&engine, ParamsMode::All, input);

    assert_eq!(
        written,
        "{\"uuid\":\"1\",\"type\":\"autocomplete\",\"autocomplete\":[[\"path\\tmodule\",\"path\"]]}\n"
    );
}

#[test]
fn goto_answers_with_locations_or_null() {
    let engine = MockEngine::new().with_definitions(Ok(vec![ResolvedLocation::new(
        Some(String::from("/usr/lib/python3/os.py")),
        10,
        0,
        false,
    )]));
    let input = concat!(
        r#"{"type":"goto","uuid":"2","source":"import os","line":1,"offset":8}"#,
        "\n",
    );

    let written = run_session(&engine, ParamsMode::All, input);
    assert_eq!(
        written,
        "{\"uuid\":\"2\",\"type\":\"goto\",\"goto\":[[\"/usr/lib/python3/os.py\",10,0]]}\n"
    );

    let unresolved = MockEngine::new().with_definitions(Err(EngineError::NotFound));
    let written = run_session(&unresolved, ParamsMode::All, input);
    assert_eq!(written, "{\"uuid\":\"2\",\"type\":\"goto\",\"goto\":null}\n");
}

#[test]
fn unresolvable_usages_produce_no_answer_but_keep_the_session_alive() {
    let engine = MockEngine::new().with_references(Err(EngineError::NotFound));
    let input = concat!(
        r#"{"type":"usages","uuid":"3","source":"import os","line":1,"offset":8}"#,
        "\n",
        r#"{"type":"goto","uuid":"4","source":"import os","line":1,"offset":8}"#,
        "\n",
    );

    let written = run_session(&engine, ParamsMode::All, input);

    assert_eq!(written, "{\"uuid\":\"4\",\"type\":\"goto\",\"goto\":[]}\n");
}

#[test]
fn funcargs_renders_the_mode_appropriate_snippet() {
    let engine = MockEngine::new().with_call_signature(Some(CallSignature::new(vec![
        String::from("a"),
        String::from("b=5"),
        String::from("*args"),
    ])));
    let input = concat!(
        r#"{"type":"funcargs","uuid":"5","source":"join(","line":1,"offset":5}"#,
        "\n",
    );

    let written = run_session(&engine, ParamsMode::All, input);
    assert_eq!(
        written,
        "{\"uuid\":\"5\",\"type\":\"funcargs\",\"funcargs\":\"${1:a}, b=${2:5}\"}\n"
    );

    let written = run_session(&engine, ParamsMode::Required, input);
    assert_eq!(
        written,
        "{\"uuid\":\"5\",\"type\":\"funcargs\",\"funcargs\":\"${1:a}\"}\n"
    );
}

#[test]
fn non_string_correlation_ids_echo_verbatim() {
    let engine = MockEngine::new();
    let input = concat!(
        r#"{"type":"usages","uuid":7,"source":"import os","line":1,"offset":8}"#,
        "\n",
    );

    let written = run_session(&engine, ParamsMode::All, input);

    assert_eq!(written, "{\"uuid\":7,\"type\":\"usages\",\"usages\":[]}\n");
}
