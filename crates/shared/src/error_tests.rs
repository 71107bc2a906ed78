use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Configuration("x".into()), 412, "CONFIGURATION_ERROR")]
#[case(AppError::Validation("x".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::NotFound("x".into()), 404, "NOT_FOUND")]
#[case(AppError::Conflict("x".into()), 409, "CONFLICT")]
#[case(
    AppError::RemoteRejection { code: "910".into(), message: "x".into() },
    502,
    "REMOTE_REJECTION"
)]
#[case(AppError::Transport("x".into()), 502, "TRANSPORT_ERROR")]
#[case(AppError::DataIntegrity("x".into()), 422, "DATA_INTEGRITY_ERROR")]
#[case(AppError::Format("x".into()), 422, "FORMAT_ERROR")]
#[case(AppError::Database("x".into()), 500, "DATABASE_ERROR")]
#[case(AppError::Internal("x".into()), 500, "INTERNAL_ERROR")]
fn test_status_and_error_codes(
    #[case] error: AppError,
    #[case] status: u16,
    #[case] code: &str,
) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::Configuration("no settings".into()).to_string(),
        "Configuration error: no settings"
    );
    assert_eq!(
        AppError::RemoteRejection {
            code: "910".into(),
            message: "Request parameter error".into()
        }
        .to_string(),
        "Remote rejection (910): Request parameter error"
    );
    assert_eq!(
        AppError::Format("bad name".into()).to_string(),
        "Format error: bad name"
    );
}

#[test]
fn test_user_facing_split() {
    assert!(AppError::Validation(String::new()).is_user_facing());
    assert!(AppError::Configuration(String::new()).is_user_facing());
    assert!(!AppError::Transport(String::new()).is_user_facing());
    assert!(
        !AppError::RemoteRejection {
            code: String::new(),
            message: String::new()
        }
        .is_user_facing()
    );
}
