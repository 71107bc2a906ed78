//! Sequence numbers and identities derived from document names.
//!
//! Names follow the ERP naming series, `PREFIX-TYPE-BRANCH-NNNNN`, with an
//! extra `-N` suffix on amended documents.

use super::error::PayloadError;

fn parse_segment(segment: &str, name: &str) -> Result<u64, PayloadError> {
    segment.parse().map_err(|_| {
        PayloadError::Format(format!(
            "segment '{segment}' of '{name}' is not a sequence number"
        ))
    })
}

/// Sequence number of a document name.
///
/// Four segments yield the last one. Five segments (an amendment) yield the
/// second-to-last. Any other shape is a format error.
pub fn extract_document_series_number(name: &str) -> Result<u64, PayloadError> {
    let segments: Vec<&str> = name.split('-').collect();
    match segments.as_slice() {
        [_, _, _, last] => parse_segment(last, name),
        [_, _, _, sequence, _] => parse_segment(sequence, name),
        _ => Err(PayloadError::Format(format!(
            "'{name}' has {} segments, expected 4 or 5",
            segments.len()
        ))),
    }
}

/// Invoice number: the trailing segment of a name with at least 3 segments.
pub fn get_invoice_number(name: &str) -> Result<u64, PayloadError> {
    let segments: Vec<&str> = name.split('-').collect();
    match segments.as_slice() {
        [_, _, .., last] => parse_segment(last, name),
        _ => Err(PayloadError::Format(format!(
            "invoice name '{name}' needs at least 3 segments"
        ))),
    }
}

/// Drops the amendment counter from an amended name.
#[must_use]
pub fn clean_invc_no(name: &str) -> &str {
    name.rsplit_once('-').map_or(name, |(head, _)| head)
}

/// Vendor identity token for a user e-mail: the part before `@`.
#[must_use]
pub fn split_user_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PRE-INV-00-00042", 42)]
    #[case("ACC-SINV-2024-00007", 7)]
    #[case("PRE-INV-00-00042-1", 42)]
    #[case("MAT-STE-2024-00113-2", 113)]
    fn test_extract_document_series_number(#[case] name: &str, #[case] expected: u64) {
        assert_eq!(extract_document_series_number(name).unwrap(), expected);
    }

    #[rstest]
    #[case("INV-0001")]
    #[case("A-B-C-D-E-F")]
    #[case("PRE-INV-00-ABC")]
    #[case("")]
    fn test_extract_rejects_bad_names(#[case] name: &str) {
        assert!(matches!(
            extract_document_series_number(name),
            Err(PayloadError::Format(_))
        ));
    }

    #[rstest]
    #[case("eTIMS-INV-00-00001", 1)]
    #[case("SINV-00-12", 12)]
    fn test_get_invoice_number(#[case] name: &str, #[case] expected: u64) {
        assert_eq!(get_invoice_number(name).unwrap(), expected);
    }

    #[test]
    fn test_get_invoice_number_requires_three_segments() {
        assert!(get_invoice_number("INV-1").is_err());
    }

    #[test]
    fn test_clean_invc_no() {
        assert_eq!(clean_invc_no("SINV-00-00012-1"), "SINV-00-00012");
        assert_eq!(clean_invc_no("PLAIN"), "PLAIN");
    }

    #[test]
    fn test_split_user_email() {
        assert_eq!(split_user_email("jane.doe@example.com"), "jane.doe");
        assert_eq!(split_user_email("Administrator"), "Administrator");
    }
}
