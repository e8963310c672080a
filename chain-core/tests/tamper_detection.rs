//! Scenario and corruption tests over committed chains
//!
//! Builds the reference ledger (an 8-line poem committed as two 4-record
//! blocks) and checks that verification accepts the honest chain and pins
//! every kind of corruption to its specific error.

use chain_core::{
    generate_keypair, hash::block_hash, verify_blocks, verify_chain, Address, Blockchain, Context,
    Ed25519Signer, Ed25519Verifier, Error, Hash, Signature,
};

const POEM: [&str; 8] = [
    "Tyger Tyger, burning bright,",
    "In the forests of the night;",
    "What immortal hand or eye,",
    "Could frame thy fearful symmetry?",
    "In what distant deeps or skies.",
    "Burnt the fire of thine eyes?",
    "On what wings dare he aspire?",
    "What the hand, dare seize the fire?",
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Directory with three participants and the poem as canonical feed
fn poem_context() -> Context {
    let mut context = Context::new();
    for name in ["alice", "bob", "carol"] {
        context.register(Address::new(name), generate_keypair("tyger"));
    }
    context.set_feed(POEM.iter().map(|line| line.as_bytes().to_vec()));
    context
}

/// Commit the poem as two blocks of four records each
fn poem_chain(context: &Context) -> Blockchain {
    let chain = Blockchain::new();
    for stanza in POEM.chunks(4) {
        let mut pending = chain.new_pending_block();
        for line in stanza {
            let (from, to) = context.random_address_pair();
            pending.add_transaction(from, to, *line);
        }
        pending.commit(context, &Ed25519Signer).unwrap();
    }
    chain
}

#[test]
fn test_poem_scenario_builds_and_verifies() {
    init_tracing();
    let context = poem_context();
    let chain = poem_chain(&context);

    // Genesis plus one block per stanza
    assert_eq!(chain.len(), 3);
    let blocks = chain.blocks();
    assert_eq!(blocks[1].transactions.len(), 4);
    assert_eq!(blocks[2].transactions.len(), 4);
    assert_eq!(blocks[2].index, 2);

    verify_chain(&chain, &context, &Ed25519Verifier).unwrap();
}

#[test]
fn test_altering_line_five_is_a_data_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    // Line 5 is feed position 4: the first transaction of the second block
    let mut snapshot = chain.blocks();
    snapshot[2].transactions[0].data = b"In what distant deeps or skies!".to_vec();

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::DataMismatch {
            block: 2,
            index: 0,
            position: 4
        }
    ));
}

#[test]
fn test_flipped_payload_byte_is_a_data_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    snapshot[1].transactions[2].data[0] ^= 0x01;

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::DataMismatch {
            block: 1,
            index: 2,
            position: 2
        }
    ));
}

#[test]
fn test_flipped_signature_byte_is_invalid() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    let mut bytes = snapshot[1].transactions[1].signature.as_bytes().to_vec();
    bytes[0] ^= 0x01;
    snapshot[1].transactions[1].signature = Signature::from_bytes(bytes);

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(err, Error::SignatureInvalid { block: 1, index: 1 }));
}

#[test]
fn test_flipped_transaction_hash_byte_is_a_hash_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    let mut bytes = *snapshot[1].transactions[3].hash.as_bytes();
    bytes[0] ^= 0x01;
    snapshot[1].transactions[3].hash = Hash::from_bytes(bytes);

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::HashMismatch {
            block: 1,
            transaction: Some(3)
        }
    ));
}

#[test]
fn test_flipped_block_hash_byte_is_a_hash_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    let mut bytes = *snapshot[2].hash.as_bytes();
    bytes[7] ^= 0x01;
    snapshot[2].hash = Hash::from_bytes(bytes);

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::HashMismatch {
            block: 2,
            transaction: None
        }
    ));
}

#[test]
fn test_corrupt_previous_hash_is_a_hash_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    // The stored block hash covers previous_hash, so the recomputation
    // diverges before the link check even runs
    let mut snapshot = chain.blocks();
    let mut bytes = *snapshot[2].previous_hash.as_bytes();
    bytes[0] ^= 0x01;
    snapshot[2].previous_hash = Hash::from_bytes(bytes);

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::HashMismatch {
            block: 2,
            transaction: None
        }
    ));
}

#[test]
fn test_corrupt_timestamp_is_a_hash_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    snapshot[1].timestamp_millis += 1;

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::HashMismatch {
            block: 1,
            transaction: None
        }
    ));
}

#[test]
fn test_corrupt_block_index_is_a_hash_mismatch() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    snapshot[1].index = 9;

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::HashMismatch {
            block: 1,
            transaction: None
        }
    ));
}

#[test]
fn test_consistently_rewritten_block_breaks_the_link() {
    let context = poem_context();
    let chain = poem_chain(&context);

    // Rewrite block 1 with a fresh timestamp and a matching recomputed
    // hash; block 2 still links to the old hash
    let mut snapshot = chain.blocks();
    let rewritten = {
        let block = &snapshot[1];
        block_hash(
            block.index,
            block.timestamp_millis + 1,
            &block.previous_hash,
            &block.transactions,
        )
    };
    snapshot[1].timestamp_millis += 1;
    snapshot[1].hash = rewritten;

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(err, Error::ChainBroken { block: 2 }));
}

#[test]
fn test_cleared_fields_are_malformed() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    snapshot[1].transactions[0].data.clear();
    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedTransaction {
            block: 1,
            index: 0,
            field: "data"
        }
    ));

    let mut snapshot = chain.blocks();
    snapshot[1].transactions[0].from = Address::new("");
    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedTransaction {
            block: 1,
            index: 0,
            field: "from"
        }
    ));
}

#[test]
fn test_swapped_sender_fails_the_signature() {
    let context = poem_context();
    let chain = poem_chain(&context);

    // Point the transaction at a different registered participant; the
    // stored signature was made by the original sender
    let mut snapshot = chain.blocks();
    let original = snapshot[1].transactions[0].from.clone();
    let replacement = if original.as_str() == "alice" {
        "bob"
    } else {
        "alice"
    };
    snapshot[1].transactions[0].from = Address::new(replacement);

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(err, Error::SignatureInvalid { block: 1, index: 0 }));
}

#[test]
fn test_unknown_sender_is_unresolved() {
    let context = poem_context();
    let chain = poem_chain(&context);

    let mut snapshot = chain.blocks();
    snapshot[1].transactions[0].from = Address::new("mallory");

    let err = verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap_err();
    assert!(matches!(err, Error::UnresolvedAddress(ref address) if address == "mallory"));
}

#[test]
fn test_double_commit_does_not_duplicate_the_block() {
    let context = poem_context();
    let chain = Blockchain::new();

    let mut pending = chain.new_pending_block();
    pending.add_transaction(
        Address::new("alice"),
        Address::new("bob"),
        POEM[0],
    );
    pending.commit(&context, &Ed25519Signer).unwrap();
    assert_eq!(chain.len(), 2);

    let err = pending.commit(&context, &Ed25519Signer).unwrap_err();
    assert!(matches!(err, Error::DoubleCommit));
    assert_eq!(chain.len(), 2);
}

#[test]
fn test_empty_pending_block_is_rejected() {
    let context = poem_context();
    let chain = Blockchain::new();

    let mut pending = chain.new_pending_block();
    let err = pending.commit(&context, &Ed25519Signer).unwrap_err();
    assert!(matches!(err, Error::EmptyBlock { .. }));
    assert_eq!(chain.len(), 1);
}

#[test]
fn test_thousand_pair_draws_are_always_distinct() {
    let context = poem_context();
    for _ in 0..1000 {
        let (from, to) = context.random_address_pair();
        assert_ne!(from, to);
    }
}

#[test]
fn test_chain_length_tracks_commit_count() {
    let mut context = poem_context();
    let lines: Vec<Vec<u8>> = (0..6).map(|i| format!("line {i}").into_bytes()).collect();
    context.set_feed(lines.clone());

    let chain = Blockchain::new();
    let mut consumed = 0;
    for batch in [1usize, 2, 3] {
        let mut pending = chain.new_pending_block();
        for line in &lines[consumed..consumed + batch] {
            let (from, to) = context.random_address_pair();
            pending.add_transaction(from, to, line.clone());
        }
        pending.commit(&context, &Ed25519Signer).unwrap();
        consumed += batch;

        // The chain verifies after every successful commit
        verify_chain(&chain, &context, &Ed25519Verifier).unwrap();
    }

    assert_eq!(chain.len(), 4);
    assert_eq!(chain.latest().index, 3);
}

#[test]
fn test_snapshot_verifies_while_the_chain_grows() {
    init_tracing();
    let context = poem_context();

    let chain = Blockchain::new();
    let mut pending = chain.new_pending_block();
    for line in &POEM[..4] {
        let (from, to) = context.random_address_pair();
        pending.add_transaction(from, to, *line);
    }
    pending.commit(&context, &Ed25519Signer).unwrap();

    let snapshot = chain.blocks();

    // Grow the chain from another handle while the snapshot is held
    std::thread::scope(|scope| {
        let writer = chain.clone();
        let context = &context;
        scope.spawn(move || {
            let mut pending = writer.new_pending_block();
            for line in &POEM[4..] {
                let (from, to) = context.random_address_pair();
                pending.add_transaction(from, to, *line);
            }
            pending.commit(context, &Ed25519Signer).unwrap();
        });
    });

    // The old snapshot is still a valid two-block chain
    verify_blocks(&snapshot, &context, &Ed25519Verifier).unwrap();
    assert_eq!(snapshot.len(), 2);

    // And the grown chain verifies end to end
    assert_eq!(chain.len(), 3);
    verify_chain(&chain, &context, &Ed25519Verifier).unwrap();
}
