//! # Deliver Flows
//!
//! Consumers seek into a live chain and are flow-controlled by their
//! acknowledgement window while producers keep ordering.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ab_03_block_assembly::{header_hash, verify_chain};
    use node_runtime::NodeConfig;
    use shared_crypto::HashAlgorithm;
    use shared_types::{
        Acknowledgement, ChainId, DeliverResponse, DeliverUpdate, SeekInfo, Status,
    };
    use std::sync::Arc;
    use std::time::Duration;

    async fn idle(consumer: &mut Consumer) -> bool {
        tokio::time::timeout(Duration::from_millis(200), consumer.next())
            .await
            .is_err()
    }

    #[tokio::test(start_paused = true)]
    async fn test_newest_follows_live_chain() {
        let service = start_service(1);
        let mut consumer = open_deliver(&service);
        consumer
            .push(DeliverUpdate::Seek(SeekInfo::newest(
                service.system_chain().clone(),
                2,
            )))
            .await
            .unwrap();
        assert_eq!(next_block(&mut consumer).await.number(), 0);
        assert!(idle(&mut consumer).await);

        let mut producer = open_broadcast(&service);
        for payload in [b"1", b"2", b"3"] {
            assert_eq!(submit(&mut producer, opaque(payload)).await, Status::Success);
        }

        // Window of two: genesis and block 1, then suspended
        let first = next_block(&mut consumer).await;
        assert_eq!(first.number(), 1);
        assert!(idle(&mut consumer).await);

        consumer
            .push(DeliverUpdate::Acknowledgement(Acknowledgement { number: 1 }))
            .await
            .unwrap();
        assert_eq!(next_block(&mut consumer).await.number(), 2);
        assert_eq!(next_block(&mut consumer).await.number(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_specified_waits_for_future_block() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);
        for payload in [b"a", b"b"] {
            submit(&mut producer, opaque(payload)).await;
        }

        let mut consumer = open_deliver(&service);
        consumer
            .push(DeliverUpdate::Seek(SeekInfo::specified(
                service.system_chain().clone(),
                5,
                3,
            )))
            .await
            .unwrap();
        assert!(idle(&mut consumer).await);

        for payload in [b"c", b"d"] {
            submit(&mut producer, opaque(payload)).await;
        }
        assert!(idle(&mut consumer).await);

        submit(&mut producer, opaque(b"e")).await;
        let block = next_block(&mut consumer).await;
        assert_eq!(block.number(), 5);
        assert_eq!(block.data.data, vec![opaque(b"e").data]);
    }

    #[tokio::test]
    async fn test_unknown_chain_not_found() {
        let service = start_service(1);
        let mut consumer = open_deliver(&service);
        consumer
            .push(DeliverUpdate::Seek(SeekInfo::oldest(ChainId::new("none"), 1)))
            .await
            .unwrap();
        assert_eq!(
            consumer.next().await,
            Some(DeliverResponse::Error(Status::NotFound))
        );
        assert_eq!(consumer.next().await, None);
    }

    #[tokio::test]
    async fn test_blake3_chain_links() {
        let mut config = NodeConfig::default();
        config.assembly.hash_algorithm = HashAlgorithm::Blake3;
        let service = start_service_with(config, 2);

        let mut producer = open_broadcast(&service);
        for i in 0..6u8 {
            producer.push(opaque(&[i])).await.unwrap();
        }
        for _ in 0..6 {
            assert_eq!(producer.next().await.unwrap().status, Status::Success);
        }

        let mut consumer = open_deliver(&service);
        consumer
            .push(DeliverUpdate::Seek(SeekInfo::oldest(
                service.system_chain().clone(),
                10,
            )))
            .await
            .unwrap();
        let mut blocks = Vec::new();
        for _ in 0..4 {
            blocks.push(Arc::new(next_block(&mut consumer).await));
        }

        assert!(verify_chain(HashAlgorithm::Blake3, &blocks).is_ok());
        assert!(verify_chain(HashAlgorithm::Sha256, &blocks).is_err());
        for pair in blocks.windows(2) {
            assert_eq!(
                pair[1].header.previous_hash,
                header_hash(HashAlgorithm::Blake3, &pair[0].header)
            );
        }
    }
}
