use crate::language::language_for;
use crate::model::{FileChange, LanguageEvolution, LanguageTotal};
use crate::util::month_key;
use std::collections::{BTreeMap, HashMap};

const TOP_LANGUAGES: usize = 8;

/// Per-language line totals in first-seen order.
#[derive(Default)]
pub(crate) struct LanguageTally {
    order: Vec<LanguageTotal>,
    index: HashMap<String, usize>,
}

impl LanguageTally {
    pub(crate) fn add(&mut self, language: &str, lines: u64) {
        match self.index.get(language) {
            Some(&i) => self.order[i].lines += lines,
            None => {
                self.index.insert(language.to_string(), self.order.len());
                self.order.push(LanguageTotal {
                    language: language.to_string(),
                    lines,
                });
            }
        }
    }

    /// Largest first; equal totals keep first-seen order.
    pub(crate) fn into_ranked(mut self) -> Vec<LanguageTotal> {
        self.order.sort_by(|a, b| b.lines.cmp(&a.lines));
        self.order
    }
}

pub fn compute_languages(file_changes: &[FileChange]) -> Vec<LanguageTotal> {
    let mut tally = LanguageTally::default();
    for fc in file_changes {
        tally.add(language_for(&fc.ext), fc.churn());
    }
    tally.into_ranked()
}

pub fn compute_language_evolution(file_changes: &[FileChange]) -> LanguageEvolution {
    let mut monthly: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    let mut totals = LanguageTally::default();

    for fc in file_changes {
        let language = language_for(&fc.ext);
        let month = month_key(&fc.timestamp.local());
        *monthly
            .entry(month)
            .or_default()
            .entry(language.to_string())
            .or_insert(0) += fc.churn();
        totals.add(language, fc.churn());
    }

    let top_languages = totals
        .into_ranked()
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|t| t.language)
        .collect();

    LanguageEvolution {
        monthly,
        top_languages,
    }
}
