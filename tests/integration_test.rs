// Integration tests for featurefit
use featurefit::artifact::LinearArtifact;
use featurefit::{
    Diagnostic, DiagnosticCode, Error, ErrorKind, FeatureSpec, GroupConfig, InputVectorBuilder,
    ModelArtifact, RawInput, RawValue, ReconciliationValidator, Schema, SchemaConfig,
    SchemaExtractor, Session, Status, ValidationOutcome,
};
use std::sync::Arc;

fn spec_schema(config: &SchemaConfig) -> Schema {
    Schema::with_config(
        vec![
            FeatureSpec::numeric("Years_Coding"),
            FeatureSpec::one_hot("Country", "India"),
            FeatureSpec::one_hot("Country", "Other"),
        ],
        config,
    )
    .unwrap()
}

fn survey_names() -> Vec<String> {
    let mut names: Vec<String> = ["Codes_In_JAVA", "Codes_In_Python", "Codes_In_SQL", "Codes_In_GO"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    names.push("Years_Coding".to_string());
    names.push("Education".to_string());
    for country in ["India", "US", "Spain", "Canada", "Other"] {
        names.push(format!("Country_{}", country));
    }
    names
}

fn survey_config() -> SchemaConfig {
    SchemaConfig::new()
        .with_group(
            GroupConfig::new("Country")
                .with_fallback("Other")
                .with_alias("United States of America", "US"),
        )
        .with_binary("Codes_In_JAVA")
        .with_binary("Codes_In_Python")
        .with_binary("Codes_In_SQL")
        .with_binary("Codes_In_GO")
        .with_ordinal("Education", [("HS", 0.0), ("BS", 1.0), ("MS", 2.0), ("PHD", 3.0)])
}

fn survey_session() -> Session {
    let names = survey_names();
    let coefficients: Vec<f64> = (0..names.len()).map(|i| 1000.0 * (i + 1) as f64).collect();
    let model = LinearArtifact::new(coefficients, 30_000.0).with_feature_names(names);
    Session::load(Arc::new(model), None, survey_config()).unwrap()
}

#[test]
fn test_known_category_is_ready() {
    let schema = spec_schema(&SchemaConfig::default());
    let input = RawInput::new().with("Years_Coding", 5).with("Country", "India");

    let built = InputVectorBuilder::new(&schema).build(&input).unwrap();
    assert_eq!(built.vector.as_slice(), &[5.0, 1.0, 0.0]);

    let outcome = ReconciliationValidator::validate(&schema, built);
    assert!(matches!(outcome, ValidationOutcome::Ready(_)));
}

#[test]
fn test_unknown_category_without_fallback_fails() {
    let schema = spec_schema(&SchemaConfig::default());
    let model = LinearArtifact::new(vec![1.0, 1.0, 1.0], 0.0);
    let session = Session::with_schema(Arc::new(schema), Arc::new(model));

    let result = session.predict(&RawInput::new().with("Years_Coding", 5).with("Country", "Germany"));
    assert_eq!(result.status, Status::Failed);
    assert_eq!(result.error_kind(), Some(ErrorKind::UnmappableCategory));
    assert!(result.prediction.is_none());
}

#[test]
fn test_unknown_category_with_fallback_is_degraded() {
    let config = SchemaConfig::new().with_group(GroupConfig::new("Country").with_fallback("Other"));
    let schema = spec_schema(&config);
    let input = RawInput::new().with("Years_Coding", 5).with("Country", "Germany");

    let built = InputVectorBuilder::new(&schema).build(&input).unwrap();
    assert_eq!(built.vector.as_slice(), &[5.0, 0.0, 1.0]);

    let outcome = ReconciliationValidator::validate(&schema, built);
    assert_eq!(outcome.status(), Status::Degraded);
    let validated = outcome.into_result().unwrap();
    assert!(validated
        .diagnostics()
        .iter()
        .any(|d| d.code() == DiagnosticCode::FallbackApplied));
}

#[test]
fn test_count_only_artifact_never_guesses() {
    let model = LinearArtifact::new(vec![0.0; 42], 0.0);
    let err = SchemaExtractor::default().extract(&model, None).unwrap_err();
    assert_eq!(err, Error::SchemaUnderspecified { feature_count: 42 });
}

#[test]
fn test_bundled_list_longer_than_model_is_refused() {
    let mut model = LinearArtifact::new(vec![0.0; 42], 0.0);
    model.columns = Some((0..43).map(|i| format!("f{}", i)).collect());

    let err = Session::load(Arc::new(model.clone()), model.bundled_columns(), SchemaConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaUnavailable);
}

#[test]
fn test_every_known_selection_yields_one_hot() {
    let session = survey_session();
    let schema = session.schema();
    let group = schema.group("Country").unwrap();

    for country in group.choices() {
        let input = RawInput::new().with("Country", country).with("Years_Coding", 3);
        let validated = session.reconcile(&input).unwrap();
        let vector = validated.vector();

        assert_eq!(vector.len(), schema.len());
        let hot = group.column_indices().filter(|&i| vector[i] == 1.0).count();
        assert_eq!(hot, 1, "country {}", country);
        assert!(!validated.is_degraded());
    }
}

#[test]
fn test_input_key_order_is_irrelevant() {
    let session = survey_session();
    let fields: Vec<(&str, RawValue)> = vec![
        ("Codes_In_SQL", RawValue::Bool(true)),
        ("Years_Coding", RawValue::Number(8.0)),
        ("Education", RawValue::Category("PHD".into())),
        ("Country", RawValue::Category("Narnia".into())),
        ("Age", RawValue::Category("30-34".into())),
        ("Student", RawValue::Category("No".into())),
    ];

    let forward: RawInput = fields.clone().into_iter().collect();
    let reverse: RawInput = fields.into_iter().rev().collect();

    let a = session.reconcile(&forward).unwrap();
    let b = session.reconcile(&reverse).unwrap();
    assert!(a.vector().bit_eq(b.vector()));
    assert_eq!(a.diagnostics(), b.diagnostics());
}

#[test]
fn test_build_twice_is_bit_identical() {
    let session = survey_session();
    let input = RawInput::new()
        .with("Years_Coding", 2.5)
        .with("Education", "BS")
        .with("Country", "United States of America");

    let a = session.reconcile(&input).unwrap();
    let b = session.reconcile(&input).unwrap();
    assert!(a.vector().bit_eq(b.vector()));
}

#[test]
fn test_full_survey_prediction() {
    let session = survey_session();
    let input = RawInput::new()
        .with("Codes_In_Python", true)
        .with("Codes_In_SQL", true)
        .with("Years_Coding", 5)
        .with("Education", "MS")
        .with("Country", "United States of America")
        .with("Age", "25-29");

    let result = session.predict(&input);
    assert_eq!(result.status, Status::Ready);
    // Python(2000) + SQL(3000) + 5 * 5000 + 2 * 6000 + US(8000) + intercept
    assert_eq!(result.prediction, Some(30_000.0 + 2000.0 + 3000.0 + 25_000.0 + 12_000.0 + 8000.0));
    assert_eq!(
        result.diagnostics,
        vec![Diagnostic::UnusedInputField { field: "Age".into() }]
    );
}

#[test]
fn test_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let config_path = dir.path().join("schema.json");

    std::fs::write(
        &model_path,
        r#"{
            "coefficients": [1500.0, 900.0, 0.0, 4000.0],
            "intercept": 20000.0,
            "columns": ["Years_Coding", "Student_Status", "Country_India", "Country_US"]
        }"#,
    )
    .unwrap();
    std::fs::write(
        &config_path,
        r#"{
            "groups": [{"name": "Country", "reference": "Other"}],
            "binary_features": ["Student_Status"]
        }"#,
    )
    .unwrap();

    let model = LinearArtifact::from_path(&model_path).unwrap();
    let config = SchemaConfig::from_path(&config_path).unwrap();
    let bundled = model.bundled_columns().map(<[String]>::to_vec);
    let session = Session::load(Arc::new(model), bundled.as_deref(), config).unwrap();

    let result = session.predict(
        &RawInput::new()
            .with("Years_Coding", 2)
            .with("Student_Status", "Yes")
            .with("Country", "Peru"),
    );
    assert_eq!(result.status, Status::Degraded);
    assert_eq!(result.prediction, Some(20_000.0 + 3000.0 + 900.0));
    assert!(matches!(
        result.diagnostics[0],
        Diagnostic::ReferenceCategoryAssumed { .. }
    ));
}

#[test]
fn test_backend_failure_is_classified() {
    struct Broken;
    impl ModelArtifact for Broken {
        fn predict(&self, _: &[f64]) -> Result<f64, featurefit::BackendError> {
            Err(featurefit::BackendError::new("model file truncated"))
        }
        fn feature_names(&self) -> Option<Vec<String>> {
            Some(vec!["Years_Coding".into()])
        }
    }

    let session = Session::load(Arc::new(Broken), None, SchemaConfig::default()).unwrap();
    let result = session.predict(&RawInput::new().with("Years_Coding", 1));

    assert_eq!(result.status, Status::Failed);
    let error = result.error.unwrap();
    assert_eq!(error.kind, ErrorKind::PredictionBackendError);
    assert!(error.message.contains("model file truncated"));
    assert!(error.message.contains("1-feature"));
}
