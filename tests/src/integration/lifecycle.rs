//! # Block Lifecycle
//!
//! Genesis through build, verify and accept/reject, driven the way a
//! consensus engine would drive it.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{node, GENESIS_TIME};
    use node_runtime::{Vm, VmConfig};
    use shared_types::{hash256, ChainState, Id};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;
    use wc_01_state_storage::{
        get_block_header, get_last_message_id, get_latest_block_header, get_message,
        FileBackedKVStore, KeyValueStore, MockTimeSource,
    };
    use wc_02_chain::{BlockStatus, ChainError, Genesis};

    fn ctx() -> CancellationToken {
        CancellationToken::new()
    }

    #[test]
    fn test_genesis_to_first_block() {
        let node = node();
        let genesis_id = node.vm.last_accepted();
        let genesis = node.vm.get_block(&genesis_id).unwrap();
        assert_eq!(genesis.height(), 0);
        assert!(genesis.parent().is_empty());
        assert_eq!(genesis.timestamp(), GENESIS_TIME);

        let block = node.vm.build_block(&ctx()).unwrap();
        assert_eq!(block.height(), 1);
        assert_eq!(block.parent(), genesis_id);

        block.verify(&ctx()).unwrap();
        block.accept(&ctx()).unwrap();

        assert_eq!(node.vm.last_accepted(), block.id());
        let at_one = node.vm.get_block_id_at_height(1).unwrap();
        assert_eq!(at_one, block.id());
        assert_eq!(node.vm.get_block(&at_one).unwrap().bytes(), block.bytes());
    }

    #[test]
    fn test_messages_flow_into_durable_store() {
        let node = node();
        let payloads: Vec<Vec<u8>> = (0..3).map(|n| format!("warp-{n}").into_bytes()).collect();
        for payload in &payloads {
            node.vm.add_message(hash256(payload), payload.clone()).unwrap();
        }

        let block = node.vm.build_block(&ctx()).unwrap();
        block.verify(&ctx()).unwrap();
        // nothing is durable before accept
        assert!(get_message(&*node.store, &hash256(&payloads[0])).is_err());
        block.accept(&ctx()).unwrap();

        for payload in &payloads {
            assert_eq!(get_message(&*node.store, &hash256(payload)).unwrap(), *payload);
        }
        assert_eq!(get_last_message_id(&*node.store).unwrap(), 3);
        let latest = get_latest_block_header(&*node.store).unwrap();
        assert_eq!(latest.hash, block.id());
        assert_eq!(latest.messages.len(), 3);
    }

    #[test]
    fn test_peer_block_round_trip() {
        let producer = node();
        let validator = node();
        producer
            .vm
            .add_message(hash256(b"x"), b"x".to_vec())
            .unwrap();
        let built = producer.vm.build_block(&ctx()).unwrap();

        // both nodes share the same genesis, so the validator can verify it
        assert_eq!(producer.vm.last_accepted(), validator.vm.last_accepted());
        let received = validator.vm.parse_block(built.bytes()).unwrap();
        assert_eq!(received.id(), built.id());
        received.verify(&ctx()).unwrap();
        received.accept(&ctx()).unwrap();
        assert_eq!(validator.vm.last_accepted(), built.id());
    }

    #[test]
    fn test_competing_branches() {
        let node = node();
        let genesis_id = node.vm.last_accepted();

        // two candidates on the tip, built at different times
        let a = node.vm.build_block(&ctx()).unwrap();
        node.clock.advance(1);
        let b = node.vm.build_block(&ctx()).unwrap();
        assert_ne!(a.id(), b.id());
        a.verify(&ctx()).unwrap();
        b.verify(&ctx()).unwrap();
        a.state().unwrap().put(b"owner", b"a").unwrap();
        b.state().unwrap().put(b"owner", b"b").unwrap();

        // extend branch a
        node.vm.set_preference(a.id());
        let a2 = node.vm.build_block(&ctx()).unwrap();
        a2.verify(&ctx()).unwrap();
        assert_eq!(a2.state().unwrap().get(b"owner").unwrap(), Some(b"a".to_vec()));

        a.accept(&ctx()).unwrap();
        assert!(!node.vm.chain().is_tracked(&genesis_id));
        // the sibling branch stays tracked until the engine rejects it
        assert!(node.vm.chain().is_tracked(&b.id()));
        assert_eq!(b.status().unwrap(), BlockStatus::Verified);
        assert_eq!(b.state().unwrap().get(b"owner").unwrap(), Some(b"b".to_vec()));

        b.reject(&ctx()).unwrap();
        assert_eq!(node.store.get(b"owner").unwrap(), Some(b"a".to_vec()));
        assert_eq!(b.status().unwrap(), BlockStatus::Unverified);
        assert!(matches!(
            node.vm.get_block(&b.id()),
            Err(e) if e.to_string().contains("not found")
        ));

        a2.accept(&ctx()).unwrap();
        assert_eq!(node.vm.last_accepted(), a2.id());
        assert_eq!(node.vm.chain().tracked_len(), 1);
    }

    #[test]
    fn test_driver_errors_for_misuse() {
        let node = node();
        let b1 = node.vm.build_block(&ctx()).unwrap();

        assert_eq!(
            b1.accept(&ctx()).unwrap_err(),
            ChainError::NotVerified { id: b1.id() }
        );
        assert!(matches!(b1.state(), Err(ChainError::ParentNotVerified)));

        node.vm.set_preference(Id([0x55; 32]));
        assert!(node.vm.build_block(&ctx()).is_err());
    }

    #[test]
    fn test_skewed_peer_block_is_rejected_until_clock_catches_up() {
        let producer = node();
        let validator = node();
        producer.clock.advance(60);
        let built = producer.vm.build_block(&ctx()).unwrap();

        let received = validator.vm.parse_block(built.bytes()).unwrap();
        let err = received.verify(&ctx()).unwrap_err();
        assert!(err.is_validation());

        validator.clock.advance(55);
        received.verify(&ctx()).unwrap();
    }

    #[test]
    fn test_restart_keeps_accepted_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.db");
        let genesis = Genesis {
            timestamp: GENESIS_TIME,
        };
        let config = VmConfig::default();

        let open = |now: u64| {
            Vm::initialize(
                Arc::new(FileBackedKVStore::open(&path).unwrap()),
                Arc::new(MockTimeSource::new(now)),
                &genesis,
                &config,
            )
            .unwrap()
        };

        let mut accepted = Vec::new();
        {
            let vm = open(GENESIS_TIME);
            vm.set_state(ChainState::NormalOp);
            for n in 0..3u8 {
                vm.add_message(hash256(&[n]), vec![n]).unwrap();
                let block = vm.build_block(&ctx()).unwrap();
                block.verify(&ctx()).unwrap();
                block.accept(&ctx()).unwrap();
                vm.set_preference(block.id());
                accepted.push(block.id());
            }
        }

        let vm = open(GENESIS_TIME + 10);
        assert_eq!(vm.last_accepted(), accepted[2]);
        for (height, id) in accepted.iter().enumerate() {
            assert_eq!(vm.get_block_id_at_height(height as u64 + 1).unwrap(), *id);
            let header = get_block_header(&**vm.store(), id).unwrap();
            assert_eq!(header.number, height as u64 + 1);
        }

        // the chain continues from the reloaded tip
        let next = vm.build_block(&ctx()).unwrap();
        assert_eq!(next.height(), 4);
        next.verify(&ctx()).unwrap();
        next.accept(&ctx()).unwrap();
    }
}
