use std::env;

/// Replace `${env:VAR_NAME}` placeholders with the value of the environment
/// variable `VAR_NAME`. Unknown variables and unterminated placeholders are
/// kept verbatim.
pub fn expand_env_placeholders(input: &str) -> String {
    const OPEN: &str = "${env:";

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            rest = "";
            break;
        };
        match env::var(&after[..end]) {
            Ok(val) => result.push_str(&val),
            Err(_) => result.push_str(&rest[start..start + OPEN.len() + end + 1]),
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}
