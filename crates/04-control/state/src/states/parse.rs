use crate::StateCx;
use event::Event;
use std::str::FromStr;

/// Whitespace tokens of a console line; empty for other categories.
pub(crate) fn tokens(event: &Event) -> Vec<String> {
    event.tokens().map(str::to_owned).collect()
}

pub(crate) fn num<T: FromStr>(token: &str) -> Option<T> {
    token.parse().ok()
}

/// Every token parsed as `T`, or `None` if any fails.
pub(crate) fn all<T: FromStr>(tokens: &[String]) -> Option<Vec<T>> {
    tokens.iter().map(|t| num(t)).collect()
}

/// Shows a leaf's usage line followed by the names it knows about.
pub(crate) fn usage(cx: &StateCx<'_>, line: &str) {
    if cx.words().is_empty() {
        cx.notice(line);
    } else {
        cx.notice(&format!("{line} [known: {}]", cx.words().join(" ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rejects_any_bad_token() {
        let good = vec!["1".to_owned(), "2".to_owned()];
        let bad = vec!["1".to_owned(), "x".to_owned()];
        assert_eq!(all::<u32>(&good), Some(vec![1, 2]));
        assert_eq!(all::<u32>(&bad), None);
    }
}
