//! # Broadcast Flows
//!
//! Many producers, one order:
//!
//! 1. Concurrent producers on one chain are linearized into a single log
//! 2. Every producer gets one response per message, in submission order
//! 3. Every consumer observes the identical block sequence

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ab_03_block_assembly::verify_chain;
    use futures::future::join_all;
    use shared_crypto::HashAlgorithm;
    use shared_types::{Block, BroadcastMessage, ChainId, DeliverUpdate, SeekInfo, Status};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_producers_linearized_consumers_agree() {
        let service = start_service(4);

        let mut producers = Vec::new();
        for p in 0..4u8 {
            let mut producer = open_broadcast(&service);
            producers.push(tokio::spawn(async move {
                for i in 0..10u8 {
                    producer.push(opaque(&[p, i])).await.unwrap();
                }
                let mut statuses = Vec::new();
                for _ in 0..10 {
                    statuses.push(producer.next().await.unwrap().status);
                }
                statuses
            }));
        }
        for statuses in join_all(producers).await {
            assert_eq!(statuses.unwrap(), vec![Status::Success; 10]);
        }

        // 40 messages in blocks of 4, after genesis
        let height = service
            .chains()
            .reader(service.system_chain())
            .unwrap()
            .height();
        assert_eq!(height, 11);

        let mut views: Vec<Vec<Block>> = Vec::new();
        for _ in 0..3 {
            let mut consumer = open_deliver(&service);
            consumer
                .push(DeliverUpdate::Seek(SeekInfo::oldest(
                    service.system_chain().clone(),
                    100,
                )))
                .await
                .unwrap();
            let mut blocks = Vec::new();
            for _ in 0..height {
                blocks.push(next_block(&mut consumer).await);
            }
            views.push(blocks);
        }

        assert_eq!(views[0], views[1]);
        assert_eq!(views[1], views[2]);

        let chain: Vec<Arc<Block>> = views[0].iter().cloned().map(Arc::new).collect();
        assert!(verify_chain(HashAlgorithm::Sha256, &chain).is_ok());

        // Each producer's messages appear in its submission order
        let ordered: Vec<Vec<u8>> = views[0][1..]
            .iter()
            .flat_map(|b| b.data.data.clone())
            .collect();
        for p in 0..4u8 {
            let expected: Vec<Vec<u8>> = (0..10u8).map(|i| opaque(&[p, i]).data).collect();
            let mine: Vec<Vec<u8>> = ordered
                .iter()
                .filter(|d| expected.contains(d))
                .cloned()
                .collect();
            assert_eq!(mine, expected);
        }
    }

    #[tokio::test]
    async fn test_bad_messages_answered_in_place() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);

        producer.push(opaque(b"first")).await.unwrap();
        producer
            .push(BroadcastMessage { data: Vec::new() })
            .await
            .unwrap();
        producer
            .push(BroadcastMessage {
                data: vec![0xde, 0xad],
            })
            .await
            .unwrap();
        producer.push(opaque(b"last")).await.unwrap();

        let mut statuses = Vec::new();
        for _ in 0..4 {
            statuses.push(producer.next().await.unwrap().status);
        }
        assert_eq!(
            statuses,
            vec![
                Status::Success,
                Status::BadRequest,
                Status::BadRequest,
                Status::Success
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_chain_not_found() {
        let service = start_service(1);
        let mut producer = open_broadcast_to(&service, ChainId::new("elsewhere"));
        assert_eq!(submit(&mut producer, opaque(b"x")).await, Status::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_batch_cut_by_timeout() {
        let service = start_service(100);
        let mut producer = open_broadcast(&service);
        assert_eq!(submit(&mut producer, opaque(b"lonely")).await, Status::Success);

        let reader = service.chains().reader(service.system_chain()).unwrap();
        assert_eq!(reader.height(), 2);
        assert_eq!(reader.get(1).unwrap().data.data, vec![opaque(b"lonely").data]);
    }
}
