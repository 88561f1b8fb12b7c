//! # Producer / Consumer Concurrency
//!
//! Message producers on their own threads race a block-production loop on
//! the async runtime.

#[cfg(test)]
mod tests {
    use super::super::fixtures::node;
    use rand::Rng;
    use shared_types::{hash256, MessageId};
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_util::sync::CancellationToken;
    use wc_03_block_builder::Event;

    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 60;

    fn message(producer: usize, seq: usize) -> (MessageId, Vec<u8>) {
        let bytes = format!("{producer}:{seq}").into_bytes();
        (hash256(&bytes), bytes)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_producers_lose_nothing() {
        let node = Arc::new(node());
        let ctx = CancellationToken::new();

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let node = Arc::clone(&node);
                std::thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for seq in 0..PER_PRODUCER {
                        let (id, bytes) = message(p, seq);
                        node.vm.add_message(id, bytes).unwrap();
                        if rng.gen_bool(0.2) {
                            std::thread::sleep(Duration::from_micros(rng.gen_range(10..200)));
                        }
                    }
                })
            })
            .collect();

        let total = PRODUCERS * PER_PRODUCER;
        let mut included: Vec<MessageId> = Vec::with_capacity(total);
        timeout(Duration::from_secs(10), async {
            while included.len() < total {
                assert_eq!(
                    node.vm.wait_for_event(&ctx).await.unwrap(),
                    Event::PendingMessages
                );
                let block = node.vm.build_block(&ctx).unwrap();
                assert!(block.block().messages.len() <= 100);
                block.verify(&ctx).unwrap();
                block.accept(&ctx).unwrap();
                node.vm.set_preference(block.id());
                included.extend(block.block().messages.iter().copied());
            }
        })
        .await
        .expect("all messages should be included");

        for handle in producers {
            handle.join().unwrap();
        }

        let unique: HashSet<_> = included.iter().collect();
        assert_eq!(unique.len(), total, "no message included twice");
        assert_eq!(node.vm.builder().pending_len(), 0);

        // each producer's messages appear in the order they were added
        let position: HashMap<MessageId, usize> =
            included.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        for p in 0..PRODUCERS {
            let order: Vec<usize> = (0..PER_PRODUCER)
                .map(|seq| position[&message(p, seq).0])
                .collect();
            assert!(order.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_waiter_wakes_from_other_thread() {
        let node = Arc::new(node());
        let ctx = CancellationToken::new();

        let waiter = {
            let node = Arc::clone(&node);
            let ctx = ctx.clone();
            tokio::spawn(async move { node.vm.wait_for_event(&ctx).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let producer = {
            let node = Arc::clone(&node);
            std::thread::spawn(move || {
                let (id, bytes) = message(0, 0);
                node.vm.add_message(id, bytes).unwrap();
            })
        };
        producer.join().unwrap();

        let event = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("single add_message should wake the waiter")
            .unwrap()
            .unwrap();
        assert_eq!(event, Event::PendingMessages);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_all_waiters_wake() {
        let node = Arc::new(node());
        let ctx = CancellationToken::new();

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let node = Arc::clone(&node);
                let ctx = ctx.clone();
                tokio::spawn(async move { node.vm.wait_for_event(&ctx).await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let (id, bytes) = message(1, 1);
        node.vm.add_message(id, bytes).unwrap();

        for waiter in waiters {
            let event = timeout(Duration::from_secs(1), waiter)
                .await
                .expect("every waiter should wake")
                .unwrap()
                .unwrap();
            assert_eq!(event, Event::PendingMessages);
        }
    }

    #[tokio::test]
    async fn test_cancel_releases_waiter() {
        let node = Arc::new(node());
        let ctx = CancellationToken::new();
        let waiter = {
            let node = Arc::clone(&node);
            let ctx = ctx.clone();
            tokio::spawn(async move { node.vm.wait_for_event(&ctx).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.cancel();
        let result = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancellation should release the waiter")
            .unwrap();
        assert!(result.unwrap_err().is_cancelled());
    }
}
