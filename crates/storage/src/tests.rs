use crate::*;
use alloy_primitives::{address, Address, Bytes, TxHash, B256, U256};
use assert_matches::assert_matches;
use ornode_primitives::{
    Attachment, Award, AwardBurn, EventId, ExecStatus, GetAwardsSpec, GetProposalsSpec,
    GetVotesSpec, Proposal, ProposalContent, Tick, Vote, VoteType,
};

const VOTER: Address = address!("0x00000000000000000000000000000000000000aa");

fn content(memo: &str) -> ProposalContent {
    ProposalContent {
        addr: address!("0x0000000000000000000000000000000000000001"),
        cdata: Bytes::from_static(&[0xde, 0xad]),
        memo: Bytes::copy_from_slice(memo.as_bytes()),
    }
}

fn tx(n: u8) -> TxHash {
    B256::with_last_byte(n)
}

fn vote(n: u8, ts: u64, vote: VoteType) -> Vote {
    Vote {
        proposal_id: B256::with_last_byte(1),
        voter: VOTER,
        vote,
        weight: U256::from(n),
        ts,
        event: EventId { tx_hash: tx(n), log_index: 0 },
    }
}

fn award(id: u64, ts: u64) -> Award {
    Award {
        token_id: U256::from(id),
        recipient: VOTER,
        mint_type: 0,
        period_number: 1,
        denomination: U256::from(10),
        group_num: None,
        level: None,
        reason: None,
        title: None,
        mint_ts: ts,
        mint_tx_hash: None,
        burn: None,
    }
}

fn creation_fills_missing_fields(db: impl OrDb) {
    let c = content("a");
    let id = c.id();
    assert_eq!(db.record_creation(id, 100, None).unwrap(), CreationOutcome::Inserted);
    assert_eq!(db.record_creation(id, 100, Some(tx(1))).unwrap(), CreationOutcome::Filled);
    assert_eq!(db.record_creation(id, 100, Some(tx(2))).unwrap(), CreationOutcome::Unchanged);

    let stored = db.proposal(id).unwrap().unwrap();
    assert_eq!(stored, Proposal::stub(id, 100, Some(tx(1))));
}

fn attach_outcomes(db: impl OrDb) {
    let c = content("a");
    let id = c.id();
    assert_matches!(db.attach_content(id, c.clone(), None).unwrap(), AttachOutcome::NotFound);

    db.record_creation(id, 100, Some(tx(1))).unwrap();
    let attachment = Attachment::CustomCall { prop_title: Some("x".into()), prop_description: None };
    assert_matches!(
        db.attach_content(id, c.clone(), Some(attachment.clone())).unwrap(),
        AttachOutcome::Attached(p) if p.content.as_ref() == Some(&c)
    );

    // a second submission keeps the first attachment
    assert_matches!(
        db.attach_content(id, c.clone(), None).unwrap(),
        AttachOutcome::AlreadyAttached(p) if p.attachment == Some(attachment.clone())
    );
    assert_matches!(
        db.attach_content(id, content("b"), None).unwrap(),
        AttachOutcome::Conflict(existing) if existing == c
    );
    assert_eq!(db.proposal(id).unwrap().unwrap().attachment, Some(attachment));
}

fn execution_and_removal(db: impl OrDb) {
    let id = content("a").id();
    let exec = ExecutionRecord { status: ExecStatus::Executed, tx_hash: Some(tx(9)), ts: Some(5) };
    assert_eq!(db.record_execution(id, exec).unwrap(), None);
    assert!(!db.set_removed(id, true).unwrap());

    db.record_creation(id, 1, None).unwrap();
    let updated = db.record_execution(id, exec).unwrap().unwrap();
    assert_eq!(updated.status, Some(ExecStatus::Executed));
    assert_eq!(updated.execute_tx_hash, Some(tx(9)));
    assert_eq!(updated.execute_ts, Some(5));

    assert!(db.set_removed(id, true).unwrap());
    assert!(db.proposals(&GetProposalsSpec::default(), 10).unwrap().is_empty());
    let spec = GetProposalsSpec { include_removed: true, ..Default::default() };
    assert_eq!(db.proposals(&spec, 10).unwrap().len(), 1);
}

fn proposal_paging(db: impl OrDb) {
    let ids: Vec<_> = (0..5u8).map(|n| content(&n.to_string()).id()).collect();
    for (n, id) in ids.iter().enumerate() {
        db.record_creation(*id, 100 + (n as u64 / 2) * 10, None).unwrap();
    }
    // create times: 100, 100, 110, 110, 120
    let all = db.proposals(&GetProposalsSpec::default(), 10).unwrap();
    let order: Vec<_> = all.iter().map(|p| p.id).collect();
    assert_eq!(order, vec![ids[4], ids[3], ids[2], ids[1], ids[0]]);

    let spec = GetProposalsSpec { before: Some(110), ..Default::default() };
    let page = db.proposals(&spec, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, ids[1]);

    let exec = ExecutionRecord { status: ExecStatus::ExecutionFailed, tx_hash: None, ts: None };
    db.record_execution(ids[2], exec).unwrap();
    let spec = GetProposalsSpec {
        exec_status_filter: Some(vec![ExecStatus::ExecutionFailed]),
        ..Default::default()
    };
    let failed = db.proposals(&spec, 10).unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, ids[2]);
}

fn stale_stub_listing(db: impl OrDb) {
    let old = content("old");
    let fresh = content("fresh");
    let filled = content("filled");
    db.record_creation(old.id(), 10, None).unwrap();
    db.record_creation(fresh.id(), 100, None).unwrap();
    db.record_creation(filled.id(), 10, None).unwrap();
    db.attach_content(filled.id(), filled.clone(), None).unwrap();

    assert_eq!(db.stale_stubs(50).unwrap(), vec![old.id()]);
    db.set_removed(old.id(), true).unwrap();
    assert!(db.stale_stubs(50).unwrap().is_empty());
}

fn pruning_and_operator_removal(db: impl OrDb) {
    let pruned = content("pruned");
    let hidden = content("hidden");
    let filled = content("filled");
    for c in [&pruned, &hidden, &filled] {
        db.record_creation(c.id(), 10, None).unwrap();
    }

    assert!(db.remove_if_stale(pruned.id(), 50).unwrap());
    assert!(!db.remove_if_stale(pruned.id(), 50).unwrap());
    let stored = db.proposal(pruned.id()).unwrap().unwrap();
    assert!(stored.removed && stored.pruned);

    // content arriving after pruning restores visibility in the same update
    assert_matches!(
        db.attach_content(pruned.id(), pruned.clone(), None).unwrap(),
        AttachOutcome::Attached(p) if !p.removed && !p.pruned
    );
    assert!(!db.proposal(pruned.id()).unwrap().unwrap().removed);

    // an operator removal is not undone by content
    assert!(db.set_removed(hidden.id(), true).unwrap());
    assert!(!db.remove_if_stale(hidden.id(), 50).unwrap());
    db.attach_content(hidden.id(), hidden.clone(), None).unwrap();
    let stored = db.proposal(hidden.id()).unwrap().unwrap();
    assert!(stored.removed && !stored.pruned);

    // a stub that received content since it was listed stays visible
    db.attach_content(filled.id(), filled.clone(), None).unwrap();
    assert!(!db.remove_if_stale(filled.id(), 50).unwrap());
    assert!(!db.proposal(filled.id()).unwrap().unwrap().removed);
    assert!(!db.remove_if_stale(content("unknown").id(), 50).unwrap());

    // operator removal takes over a pruned record
    let late = content("late");
    db.record_creation(late.id(), 10, None).unwrap();
    db.remove_if_stale(late.id(), 50).unwrap();
    db.set_removed(late.id(), true).unwrap();
    db.attach_content(late.id(), late.clone(), None).unwrap();
    assert!(db.proposal(late.id()).unwrap().unwrap().removed);
}

fn votes_are_idempotent_and_filtered(db: impl OrDb) {
    assert!(db.insert_vote(vote(1, 10, VoteType::Yes)).unwrap());
    assert!(!db.insert_vote(vote(1, 10, VoteType::Yes)).unwrap());
    assert!(db.insert_vote(vote(2, 20, VoteType::No)).unwrap());
    assert!(db.insert_vote(vote(3, 30, VoteType::Yes)).unwrap());

    let all = db.votes(&GetVotesSpec::default(), 10).unwrap();
    assert_eq!(all.iter().map(|v| v.ts).collect::<Vec<_>>(), vec![30, 20, 10]);

    let spec = GetVotesSpec { vote_type: Some(VoteType::Yes), before: Some(30), ..Default::default() };
    let yes = db.votes(&spec, 10).unwrap();
    assert_eq!(yes.len(), 1);
    assert_eq!(yes[0].ts, 10);

    let spec = GetVotesSpec { min_weight: Some(U256::from(2)), ..Default::default() };
    assert_eq!(db.votes(&spec, 1).unwrap()[0].ts, 30);
}

fn awards_and_burns(db: impl OrDb) {
    assert!(db.insert_award(award(1, 10)).unwrap());
    assert!(!db.insert_award(award(1, 99)).unwrap());
    assert!(db.insert_award(award(2, 20)).unwrap());
    assert_eq!(db.award(U256::from(1)).unwrap().unwrap().mint_ts, 10);
    assert_eq!(db.award(U256::from(3)).unwrap(), None);

    let burn = AwardBurn { tx_hash: Some(tx(7)), reason: Some("oops".into()) };
    assert!(db.set_burn(U256::from(1), burn.clone()).unwrap());
    assert!(!db.set_burn(U256::from(3), burn.clone()).unwrap());
    assert_eq!(db.award(U256::from(1)).unwrap().unwrap().burn, Some(burn));

    let live = db.awards(&GetAwardsSpec { burned: Some(false), ..Default::default() }, 10).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token_id, U256::from(2));
    let all = db.awards(&GetAwardsSpec::default(), 10).unwrap();
    assert_eq!(all.iter().map(|a| a.mint_ts).collect::<Vec<_>>(), vec![20, 10]);
}

fn ticks_count_once(db: impl OrDb) {
    let tick = |n: u8| Tick { event: EventId { tx_hash: tx(n), log_index: 3 }, block_number: 1, ts: 1 };
    assert_eq!(db.tick_count().unwrap(), 0);
    assert!(db.insert_tick(tick(1)).unwrap());
    assert!(!db.insert_tick(tick(1)).unwrap());
    assert!(db.insert_tick(tick(2)).unwrap());
    assert_eq!(db.tick_count().unwrap(), 2);
}

macro_rules! backend_tests {
    ($($name:ident),* $(,)?) => {
        mod memory {
            $(
                #[test]
                fn $name() {
                    super::$name(crate::MemoryOrDb::new());
                }
            )*
        }

        mod redb_backend {
            $(
                #[test]
                fn $name() {
                    let dir = tempfile::tempdir().unwrap();
                    super::$name(crate::RedbOrDb::open(dir.path().join("ornode.redb")).unwrap());
                }
            )*
        }
    };
}

backend_tests!(
    creation_fills_missing_fields,
    attach_outcomes,
    execution_and_removal,
    proposal_paging,
    stale_stub_listing,
    pruning_and_operator_removal,
    votes_are_idempotent_and_filtered,
    awards_and_burns,
    ticks_count_once,
);

#[test]
fn redb_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ornode.redb");
    let c = content("a");
    {
        let db = RedbOrDb::open(&path).unwrap();
        db.record_creation(c.id(), 100, Some(tx(1))).unwrap();
        db.attach_content(c.id(), c.clone(), None).unwrap();
        db.insert_vote(vote(1, 10, VoteType::Yes)).unwrap();
        db.insert_award(award(1, 10)).unwrap();
    }

    let db = RedbOrDb::open(&path).unwrap();
    assert_eq!(db.proposal(c.id()).unwrap().unwrap().content, Some(c));
    assert_eq!(db.votes(&GetVotesSpec::default(), 10).unwrap().len(), 1);
    // sequence numbers keep increasing across reopen
    db.record_creation(content("b").id(), 100, None).unwrap();
    let page = db.proposals(&GetProposalsSpec::default(), 10).unwrap();
    assert_eq!(page[0].id, content("b").id());
}
