use crate::ocr::CommandOutput;

/// First non-empty line of `tesseract --version`, e.g. `tesseract 5.3.0`.
pub fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Language codes listed by `tesseract --list-langs`.
///
/// The first line is a header (`List of available languages in "..." (3):`)
/// and is discarded; the remaining non-blank lines are codes.
pub fn parse_language_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The stream a listing was printed on. Recent tesseract releases use
/// stdout; older ones wrote to stderr.
pub fn listing_text(output: &CommandOutput) -> &str {
    if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    }
}

/// Configured codes absent from `available`, in configured order.
pub fn missing_languages(configured: &[&str], available: &[String]) -> Vec<String> {
    configured
        .iter()
        .filter(|code| !available.iter().any(|a| a == *code))
        .map(|code| code.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn version_is_first_line() {
        let output = "tesseract 5.3.0\n leptonica-1.82.0\n  libgif 5.2.1 : libjpeg 8d\n";
        assert_eq!(parse_version(output).as_deref(), Some("tesseract 5.3.0"));
    }

    #[test]
    fn version_of_empty_output_is_none() {
        assert_eq!(parse_version("\n  \n"), None);
    }

    #[test]
    fn language_list_skips_header_and_blanks() {
        let output = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\n\n osd \nspa\n";
        assert_eq!(parse_language_list(output), vec!["eng", "osd", "spa"]);
    }

    #[test]
    fn language_list_of_header_only_is_empty() {
        assert!(parse_language_list("List of available languages (0):\n").is_empty());
        assert!(parse_language_list("").is_empty());
    }

    #[test]
    fn missing_is_configured_minus_available() {
        let available = parse_language_list("List of available languages (2):\neng\nspa");
        assert_eq!(missing_languages(&["spa", "fra"], &available), vec!["fra"]);
        assert!(missing_languages(&["eng", "spa"], &available).is_empty());
    }

    #[test]
    fn listing_falls_back_to_stderr() {
        let output = CommandOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: "List of available languages (1):\neng\n".to_string(),
        };
        assert_eq!(parse_language_list(listing_text(&output)), vec!["eng"]);
    }
}
