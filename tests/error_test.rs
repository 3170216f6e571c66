//! Tests for error types

use std::path::PathBuf;

use trial_stats::experiment::NormalizationSkipped;
use trial_stats::Error;

#[test]
fn test_invalid_result_file_error() {
    let error = Error::InvalidResultFile {
        path: PathBuf::from("results/bandit_43.json"),
        reason: "missing \"parameters\" object".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid result file"));
    assert!(error_str.contains("bandit_43.json"));
    assert!(error_str.contains("Expected a JSON object"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("trial record must be a JSON object".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("JSON object"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
    assert!(format!("{error:?}").contains("Json"));
}

#[test]
fn test_normalization_skipped_messages() {
    let error = NormalizationSkipped::LengthMismatch {
        metric: 3,
        baseline: 2,
    };
    assert_eq!(
        error.to_string(),
        "series length 3 does not match baseline length 2"
    );
    assert_eq!(
        NormalizationSkipped::NotASeries("scalar").to_string(),
        "scalar metric cannot be divided by this baseline"
    );
    assert_eq!(NormalizationSkipped::ZeroBaseline.to_string(), "baseline is zero");
}

#[test]
fn test_result_type_alias() {
    #[allow(clippy::unnecessary_wraps)]
    fn returns_result() -> trial_stats::Result<i32> {
        Ok(42)
    }

    let result = returns_result();
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), 42);
}
