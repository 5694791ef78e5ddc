//! # Configuration Flows
//!
//! Configuration updates travel through Broadcast like any message, are
//! authorized at their position in the order and take effect right after
//! their block commits.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{codec, Status, Transaction, MAX_MESSAGE_BYTES};

    #[tokio::test]
    async fn test_unsigned_update_forbidden() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);

        let update = batch_size_update(&service, 1, 5, &[]);
        assert_eq!(submit(&mut producer, update).await, Status::Forbidden);
        assert_eq!(sequence(&service), 0);

        let reader = service.chains().reader(service.system_chain()).unwrap();
        assert_eq!(reader.height(), 1);
    }

    #[tokio::test]
    async fn test_stranger_signature_forbidden() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);
        let stranger = Ed25519KeyPair::from_seed([7u8; 32]);

        let update = batch_size_update(&service, 1, 5, &[&stranger]);
        assert_eq!(submit(&mut producer, update).await, Status::Forbidden);
        assert_eq!(sequence(&service), 0);
    }

    #[tokio::test]
    async fn test_sequence_gap_bad_request() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);
        let admin = admin();

        for next in 1..=2 {
            let update = batch_size_update(&service, next, 2, &[&admin]);
            assert_eq!(submit(&mut producer, update).await, Status::Success);
        }
        assert_eq!(sequence(&service), 2);

        let skipping = batch_size_update(&service, 4, 3, &[&admin]);
        assert_eq!(submit(&mut producer, skipping).await, Status::BadRequest);
        assert_eq!(sequence(&service), 2);
    }

    #[tokio::test]
    async fn test_replayed_update_bad_request() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);
        let update = batch_size_update(&service, 1, 2, &[&admin()]);

        assert_eq!(submit(&mut producer, update.clone()).await, Status::Success);
        assert_eq!(submit(&mut producer, update).await, Status::BadRequest);
        assert_eq!(sequence(&service), 1);
    }

    #[tokio::test]
    async fn test_update_isolated_and_applied() {
        let service = start_service(1);
        let mut producer = open_broadcast(&service);

        let update = batch_size_update(&service, 1, 2, &[&admin()]);
        assert_eq!(submit(&mut producer, update.clone()).await, Status::Success);

        // New batch size: two messages share the next block
        producer.push(opaque(b"a")).await.unwrap();
        producer.push(opaque(b"b")).await.unwrap();
        assert_eq!(producer.next().await.unwrap().status, Status::Success);
        assert_eq!(producer.next().await.unwrap().status, Status::Success);

        let reader = service.chains().reader(service.system_chain()).unwrap();
        assert_eq!(reader.height(), 3);

        let config_block = reader.get(1).unwrap();
        assert_eq!(config_block.data.data, vec![update.data]);
        let tx: Transaction = codec::decode(&config_block.data.data[0], MAX_MESSAGE_BYTES).unwrap();
        assert_eq!(tx.as_configuration().map(|e| e.sequence), Some(1));

        assert_eq!(reader.get(2).unwrap().data.data.len(), 2);
    }
}
