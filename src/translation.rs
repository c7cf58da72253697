use std::borrow::Cow;

/// Rewrite bare `?` placeholders to Postgres-style `$1`, `$2`, … numbered
/// left to right in source order.
///
/// Placeholders inside single-quoted literals, double-quoted identifiers,
/// line/block comments and dollar-quoted blocks are left untouched. Returns a
/// borrowed `Cow` when the statement contains no placeholders.
#[must_use]
pub fn number_placeholders(sql: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    // Start of the pending span that has not been copied to `out` yet.
    let mut span_start = 0;
    let mut state = State::Normal;
    let mut next_param = 1u32;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b'?' => {
                    let buf = out.get_or_insert_with(String::new);
                    buf.push_str(&sql[span_start..idx]);
                    buf.push('$');
                    buf.push_str(&next_param.to_string());
                    next_param += 1;
                    span_start = idx + 1;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len();
                    state = State::Normal;
                }
            }
        }

        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[span_start..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'$' {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..=end].starts_with(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_placeholders_in_order() {
        let sql = "select * from tasks where status = ? and priority = ?";
        let res = number_placeholders(sql);
        assert_eq!(res, "select * from tasks where status = $1 and priority = $2");
    }

    #[test]
    fn insert_with_many_placeholders() {
        let sql = "insert into t (a, b, c) values (?, ?, ?)";
        assert_eq!(
            number_placeholders(sql),
            "insert into t (a, b, c) values ($1, $2, $3)"
        );
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', \"co?l\" -- ?\n/* ? */ from t where a = ?";
        let res = number_placeholders(sql);
        assert_eq!(res, "select '?', \"co?l\" -- ?\n/* ? */ from t where a = $1");
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$fn$ select ? from t $fn$ where a = ?";
        let res = number_placeholders(sql);
        assert_eq!(res, "$fn$ select ? from t $fn$ where a = $1");
    }

    #[test]
    fn escaped_quotes_stay_quoted() {
        let sql = "select 'it''s ?' where a = ?";
        assert_eq!(number_placeholders(sql), "select 'it''s ?' where a = $1");
    }

    #[test]
    fn non_ascii_text_survives_rewriting() {
        let sql = "select 'héllo' from t where a = ? and b = ?";
        assert_eq!(
            number_placeholders(sql),
            "select 'héllo' from t where a = $1 and b = $2"
        );
    }

    #[test]
    fn borrows_when_nothing_to_rewrite() {
        let sql = "select 1";
        let res = number_placeholders(sql);
        assert!(matches!(res, Cow::Borrowed(_)));
        assert_eq!(res, sql);
    }
}
