/// Derive the identifier used for generated module and builder names from a sheet name.
///
/// Every character that is not alphanumeric is dropped. The original name is still what the
/// generated code uses as the sheet title.
///
/// ```
/// assert_eq!(xlsxmap_model::sanitize_identifier("Q1 Report!"), "Q1Report");
/// ```
pub fn sanitize_identifier(sheet_name: &str) -> String {
    sheet_name.chars().filter(|c| c.is_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_whitespace() {
        assert_eq!(sanitize_identifier("Q1 Report!"), "Q1Report");
        assert_eq!(sanitize_identifier("  Sales - 2024 "), "Sales2024");
        assert_eq!(sanitize_identifier("!!!"), "");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(sanitize_identifier("Preços (R$)"), "PreçosR");
    }
}
