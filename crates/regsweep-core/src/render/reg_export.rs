use crate::model::ResultItem;

/// First line of every non-empty export
pub const REG_HEADER: &str = "Windows Registry Editor Version 5.00";

/// Render results as `.reg` lines
///
/// Produces:
/// - Nothing at all for an empty result list
/// - The header line
/// - A blank line and `[key path]` whenever the key changes
/// - `@=data` for the default value, `"name"=data` otherwise
/// - One trailing blank line
///
/// A CRLF inside named value data is doubled; default value data is written
/// as is. Long hex lists are not wrapped.
///
/// # Arguments
/// * `results` - Results in discovery order
///
/// # Returns
/// Lines without terminators
pub fn export_lines(results: &[ResultItem]) -> Vec<String> {
    if results.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![REG_HEADER.to_string()];
    let mut current_key: Option<&str> = None;

    for item in results {
        if current_key != Some(item.key_path()) {
            current_key = Some(item.key_path());
            lines.push(String::new());
            lines.push(format!("[{}]", item.key_path()));
        }

        if item.value_name().is_empty() {
            lines.push(format!("@={}", item.value_data()));
        } else {
            let data = item.value_data().replace("\r\n", "\r\n\r\n");
            lines.push(format!("\"{}\"={}", item.value_name(), data));
        }
    }

    lines.push(String::new());
    lines
}

/// Join [`export_lines`] into file text, each line terminated by CRLF
pub fn to_reg_text(results: &[ResultItem]) -> String {
    export_lines(results)
        .iter()
        .map(|line| format!("{}\r\n", line))
        .collect()
}
