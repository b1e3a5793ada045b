use std::collections::{BTreeMap, HashMap};

use super::{BugHistory, Transition};

/// How often one status transition happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub from: String,
    pub to: String,
    pub count: usize,
}

/// Counts transitions in first-seen order
#[derive(Debug, Default)]
struct TransitionCounter {
    index: HashMap<(String, String), usize>,
    entries: Vec<SummaryEntry>,
}

impl TransitionCounter {
    fn add(&mut self, transition: &Transition) {
        let key = (transition.from.clone(), transition.to.clone());
        match self.index.get(&key) {
            Some(&idx) => self.entries[idx].count += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(SummaryEntry {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                    count: 1,
                });
            }
        }
    }
}

/// Count every transition across all bugs, most frequent first. Ties keep the
/// order in which the transition was first seen.
pub fn summarise(histories: &[BugHistory]) -> Vec<SummaryEntry> {
    let mut counter = TransitionCounter::default();
    for transition in histories.iter().flat_map(|h| &h.transitions) {
        counter.add(transition);
    }

    let mut entries = counter.entries;
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Count transitions per level, lowest level first. Bugs without a level are
/// left out; inside a level entries stay in first-seen order.
pub fn summarise_by_level(histories: &[BugHistory]) -> BTreeMap<u32, Vec<SummaryEntry>> {
    let mut counters: BTreeMap<u32, TransitionCounter> = BTreeMap::new();

    for history in histories {
        let Some(rank) = history.level.rank() else {
            continue;
        };
        let counter = counters.entry(rank).or_default();
        for transition in &history.transitions {
            counter.add(transition);
        }
    }

    counters
        .into_iter()
        .map(|(rank, counter)| (rank, counter.entries))
        .collect()
}
