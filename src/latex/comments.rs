use super::patterns::COMMENT_BLOCK;

/// Byte index of the `%` that starts a comment in `line`, if any.
///
/// `\%` is a literal percent sign, but `\\%` is a line break followed by a
/// comment.
fn comment_index(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut start = 0;
    while let Some(offset) = line[start..].find('%') {
        let index = start + offset;
        let escaped = index >= 1 && bytes[index - 1] == b'\\';
        if !escaped {
            return Some(index);
        }
        if index >= 2 && bytes[index - 2] == b'\\' {
            return Some(index);
        }
        start = index + 1;
    }
    None
}

/// Drops blank lines, whole-line comments, trailing comments and
/// `\begin{comment}` blocks.
pub fn remove_comments(tex: &str) -> String {
    let mut result = String::with_capacity(tex.len());
    for line in tex.split_inclusive('\n') {
        if line.trim().is_empty() || line.trim_start().starts_with('%') {
            continue;
        }

        match comment_index(line) {
            Some(index) => {
                result.push_str(line[..index].trim_end());
                result.push('\n');
            }
            None => result.push_str(line),
        }
    }

    COMMENT_BLOCK.replace_all(&result, "").into_owned()
}
