use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Run<'a> {
    fn as_str(&self) -> &'a str {
        match *self {
            Run::Digits(s) | Run::Text(s) => s,
        }
    }
}

/// Splits `s` into maximal runs of ASCII digits and non-digits.
fn runs(s: &str) -> impl Iterator<Item = Run<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(if digits {
            Run::Digits(run)
        } else {
            Run::Text(run)
        })
    })
}

/// Compares two digit runs by numeric value without parsing, so runs of any
/// length are supported. Leading zeros do not count.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural-order comparison of two names.
///
/// Each name is split into alternating runs of digits and non-digits. Runs
/// are compared pairwise: two digit runs by numeric value, anything else by
/// character code. The first differing run decides. When one run sequence is
/// a prefix of the other, the shorter name sorts first.
///
/// Names differing only by leading zeros (`file012` and `file12`) compare
/// equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);
    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Run::Digits(x)), Some(Run::Digits(y))) => cmp_digits(x, y),
            (Some(x), Some(y)) => x.as_str().cmp(y.as_str()),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    #[test]
    fn splits_into_alternating_runs() {
        let parts: Vec<Run<'_>> = runs("ab12cd003").collect();
        assert_eq!(
            parts,
            vec![
                Run::Text("ab"),
                Run::Digits("12"),
                Run::Text("cd"),
                Run::Digits("003"),
            ]
        );
        assert_eq!(runs("").count(), 0);
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(natural_cmp("file2", "file10"), Ordering::Less);
        assert_eq!(natural_cmp("file10", "file2"), Ordering::Greater);
        assert_eq!(natural_cmp("file012", "file12"), Ordering::Equal);
        assert_eq!(natural_cmp("file012", "file3"), Ordering::Greater);
    }

    #[test]
    fn long_digit_runs_do_not_overflow() {
        let big = "file99999999999999999999999999999999";
        let bigger = "file100000000000000000000000000000000";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
    }

    #[test]
    fn text_compares_by_character_code() {
        assert_eq!(natural_cmp("fileABC", "filea"), Ordering::Less);
        assert_eq!(natural_cmp("file1", "filea"), Ordering::Less);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("file", "file1"), Ordering::Less);
        assert_eq!(natural_cmp("file3", "file3bis"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn sorts_mixed_names() {
        let names = sorted(&[
            "file2.txt",
            "file1.txt",
            "file3.txt",
            "file21.txt",
            "fileABC.txt",
            "filea.txt",
            "file012.txt",
            "file145879.txt",
            "file3bis.txt",
        ]);
        assert_eq!(
            names,
            vec![
                "file1.txt",
                "file2.txt",
                "file3.txt",
                "file3bis.txt",
                "file012.txt",
                "file21.txt",
                "file145879.txt",
                "fileABC.txt",
                "filea.txt",
            ]
        );
    }
}
