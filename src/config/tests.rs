use super::*;

#[test]
fn test_default_config() {
    let config = AnalyzerConfig::default();
    assert_eq!(config.max_depth, 5);
    assert_eq!(config.max_context_budget, 10_000);
    assert!((config.min_cohesion - 0.6).abs() < f64::EPSILON);
    assert!((config.max_fragmentation - 0.5).abs() < f64::EPSILON);
    assert!(!config.include_build_artifacts);
    assert!((config.domain.confidence_floor - 0.3).abs() < f64::EPSILON);
    assert_eq!(config.domain.co_usage_threshold, 3);
    assert_eq!(config.consolidation.min_co_usage, 5);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let config: AnalyzerConfig = toml::from_str(
        r#"
max_depth = 8

[domain]
keywords = ["warehouse"]
"#,
    )
    .unwrap();
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.max_context_budget, 10_000);
    assert_eq!(config.domain.keywords, vec!["warehouse".to_string()]);
    assert!(config.domain.auto_detect_keywords);
    assert_eq!(config.domain.weights, SignalWeights::default());
}

#[test]
fn test_weights_from_toml() {
    let config: AnalyzerConfig = toml::from_str(
        r#"
[domain.weights]
export_name = 0.5
"#,
    )
    .unwrap();
    assert!((config.domain.weights.export_name - 0.5).abs() < f64::EPSILON);
    assert!((config.domain.weights.co_usage - 0.35).abs() < f64::EPSILON);

    let sanitized = config.sanitized();
    assert!(sanitized.domain.weights.is_valid());
}

#[test]
fn test_load_project_config_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("context-analyzer.toml"),
        "min_cohesion = 0.75\ninclude_build_artifacts = true\n",
    )
    .unwrap();

    let config = load_project_config(dir.path());
    assert!((config.min_cohesion - 0.75).abs() < f64::EPSILON);
    assert!(config.include_build_artifacts);
}

#[test]
fn test_load_project_config_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".context-analyzer.json"),
        r#"{ "max_context_budget": 4000 }"#,
    )
    .unwrap();

    let config = load_project_config(dir.path());
    assert_eq!(config.max_context_budget, 4000);
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("context-analyzer.toml"), "max_depth = \"deep\"").unwrap();

    let config = load_project_config(dir.path());
    assert_eq!(config, AnalyzerConfig::default());
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(load_project_config(dir.path()), AnalyzerConfig::default());
}

#[test]
fn test_sanitized_clamps_ranges() {
    let mut config = AnalyzerConfig::default();
    config.min_cohesion = 1.7;
    config.domain.confidence_floor = -0.2;
    let config = config.sanitized();
    assert_eq!(config.min_cohesion, 1.0);
    assert_eq!(config.domain.confidence_floor, 0.0);
}

#[test]
fn test_infinite_weight_from_toml_is_dropped() {
    let config: AnalyzerConfig = toml::from_str(
        r#"
[domain.weights]
co_usage = inf
"#,
    )
    .unwrap();
    assert!(config.domain.weights.co_usage.is_infinite());

    let weights = config.sanitized().domain.weights;
    assert!(weights.is_valid());
    assert_eq!(weights.co_usage, 0.0);
    assert!((weights.type_reference - 0.30 / 0.65).abs() < 1e-9);
}
