//! Parse raw completion text into tab-separated rows

/// Split a raw completion into rows of fields.
///
/// Lines are split on `\n` (a trailing `\r` is dropped) and fields on `\t`.
/// Whitespace-only lines are discarded. Fields are kept verbatim; trimming
/// happens when the persisted table is normalized.
pub fn parse_rows(response: &str) -> Vec<Vec<String>> {
    strip_code_fence(response)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Remove a markdown code fence wrapped around the whole response
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return response;
    }

    // Skip the opening fence line (``` or ```tsv) and a closing fence if present
    let body = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => return "",
    };
    body.trim_end().strip_suffix("```").unwrap_or(body)
}
