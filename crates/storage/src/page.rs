use ornode_primitives::{Award, Proposal, Timestamp, Vote};
use serde::{Deserialize, Serialize};

/// A document with its insertion sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Stored<T> {
    pub(crate) seq: u64,
    pub(crate) doc: T,
}

/// Timestamp a document is paged by.
pub(crate) trait Paged {
    fn page_ts(&self) -> Timestamp;
}

impl Paged for Proposal {
    fn page_ts(&self) -> Timestamp {
        self.create_ts.unwrap_or_default()
    }
}

impl Paged for Vote {
    fn page_ts(&self) -> Timestamp {
        self.ts
    }
}

impl Paged for Award {
    fn page_ts(&self) -> Timestamp {
        self.mint_ts
    }
}

/// Returns up to `limit` matching documents, newest first, later insertions first on ties.
pub(crate) fn page<T, I>(docs: I, matches: impl Fn(&T) -> bool, limit: usize) -> Vec<T>
where
    T: Paged,
    I: IntoIterator<Item = Stored<T>>,
{
    let mut hits: Vec<_> = docs.into_iter().filter(|s| matches(&s.doc)).collect();
    hits.sort_unstable_by(|a, b| {
        b.doc.page_ts().cmp(&a.doc.page_ts()).then_with(|| b.seq.cmp(&a.seq))
    });
    hits.into_iter().take(limit).map(|s| s.doc).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    fn stored(seq: u64, ts: Timestamp) -> Stored<Proposal> {
        Stored { seq, doc: Proposal::stub(B256::with_last_byte(seq as u8), ts, None) }
    }

    #[test]
    fn newest_first_with_insertion_tiebreak() {
        let docs = vec![stored(0, 10), stored(1, 30), stored(2, 10), stored(3, 20)];
        let page = page(docs, |_| true, 3);
        let seqs: Vec<_> = page.iter().map(|p| p.id[31]).collect();
        assert_eq!(seqs, vec![1, 3, 2]);
    }
}
