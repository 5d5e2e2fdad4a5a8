use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Best fuzzy match for `query` among `choices`. Ties go to the earlier choice.
pub fn best_match<'a>(choices: &'a [String], query: &str) -> Option<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    choices
        .iter()
        .filter_map(|choice| matcher.fuzzy_match(choice, query).map(|score| (score, choice)))
        .fold(None, |best: Option<(i64, &String)>, (score, choice)| match best {
            Some((best_score, _)) if best_score >= score => best,
            _ => Some((score, choice)),
        })
        .map(|(_, choice)| choice.as_str())
}
