/// Derives the S3 key for a recording from its file name.
///
/// Recordings are named `<camera>_<year>_<month>_<day>_<hour>_<minute>_<second>.<ext>`.
/// Only the first four underscore-delimited fields are extracted; the
/// rest of the name is carried into the key unchanged. The resulting
/// key is `<camera>/<year>/<month>/<day>/<original_file_name>`.
///
/// Returns `None` when the name has fewer than four underscores. No
/// range checks are made on the date fields; matching is purely
/// structural.
pub fn parse_key(file_name: &str) -> Option<String> {
    let mut fields = file_name.splitn(5, '_');
    let camera = fields.next()?;
    let year = fields.next()?;
    let month = fields.next()?;
    let day = fields.next()?;
    fields.next()?;

    Some(format!("{camera}/{year}/{month}/{day}/{file_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_recording_name() {
        assert_eq!(
            parse_key("frontdoor_2024_03_15_08_30_00.mp4"),
            Some("frontdoor/2024/03/15/frontdoor_2024_03_15_08_30_00.mp4".to_string())
        );
    }

    #[test]
    fn test_parse_key_keeps_trailing_fields_unparsed() {
        assert_eq!(
            parse_key("garage_2023_12_01_rest.ext"),
            Some("garage/2023/12/01/garage_2023_12_01_rest.ext".to_string())
        );
    }

    #[test]
    fn test_parse_key_is_structural_not_semantic() {
        // No calendar validation: nonsense date fields still produce a key.
        assert_eq!(
            parse_key("cam_9999_77_88_x.mp4"),
            Some("cam/9999/77/88/cam_9999_77_88_x.mp4".to_string())
        );
    }

    #[test]
    fn test_parse_key_too_few_fields() {
        assert_eq!(parse_key("badname.mp4"), None);
        assert_eq!(parse_key("cam_2024_03.mp4"), None);
        assert_eq!(parse_key("cam_2024_03_15"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn test_parse_key_trailing_underscore() {
        // Four underscores with nothing after the last one still match.
        assert_eq!(
            parse_key("cam_2024_03_15_"),
            Some("cam/2024/03/15/cam_2024_03_15_".to_string())
        );
    }

    #[test]
    fn test_parse_key_idempotent() {
        let first = parse_key("frontdoor_2024_03_15_08_30_00.mp4");
        let second = parse_key("frontdoor_2024_03_15_08_30_00.mp4");
        assert_eq!(first, second);
    }
}
