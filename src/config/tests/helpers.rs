//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::FerryConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Helper to compose a [`FerryConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> FerryConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    FerryConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// Configuration with every required value set.
pub fn complete_config() -> FerryConfig {
    FerryConfig {
        source_url: Some("https://github.com".to_owned()),
        source_org: Some("acme".to_owned()),
        source_token: Some("source-token".to_owned()),
        target_url: Some("ghe.example.com".to_owned()),
        target_org: Some("acme-new".to_owned()),
        target_token: Some("target-token".to_owned()),
        user: Some("deploy".to_owned()),
        ..FerryConfig::default()
    }
}
