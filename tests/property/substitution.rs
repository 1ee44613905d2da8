//! Property-based tests for `${NAME}` substitution

use mountplan::compiler::env_subst::{substitute_str, substitute_value};
use mountplan::env::fixed_env;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_text_without_tokens_is_unchanged() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let env = fixed_env([("FOO", "bar")]);

    runner
        .run(&"[a-zA-Z0-9 _{}$/:.-]{0,40}", |text| {
            prop_assume!(!text.contains("${"));
            assert_eq!(substitute_str(&text, &env), text);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_substituted_values_are_not_rescanned() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[A-Z]{1,6}", |name| {
            let env = fixed_env([(name.clone(), format!("${{{}}}", name))]);
            let text = format!("x-${{{}}}-y", name);
            assert_eq!(substitute_str(&text, &env), text);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_keys_are_never_substituted() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let env = fixed_env([("KEY", "value")]);

    runner
        .run(&"[a-z]{1,6}", |prefix| {
            let key = format!("{}${{KEY}}", prefix);
            let value = json!({ key.clone(): "${KEY}" });
            let substituted = substitute_value(value, &env);
            assert_eq!(substituted[&key], "value");
            Ok(())
        })
        .unwrap();
}
