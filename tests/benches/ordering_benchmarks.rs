//! # Ordering Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Block assembly | cut batches, hash and link blocks |
//! | Policy evaluation | k-of-n threshold over verified signers |
//! | Signatures | endorsement verification |

use ab_01_policy_evaluation::{
    sign_payload, Ed25519Verifier, PolicyConfig, PolicyEvaluationApi, PolicyEvaluator, SignerSet,
};
use ab_03_block_assembly::{data_hash, next_block, BlockCutter, PendingMessage};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_crypto::{Ed25519KeyPair, HashAlgorithm};
use shared_types::{BlockData, BlockHeader, Policy, SignaturePolicy, SignaturePolicyEnvelope};
use std::sync::Arc;

fn bench_block_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("block-assembly");

    for size in [10usize, 100, 1000] {
        let messages: Vec<Vec<u8>> = (0..size).map(|i| vec![(i % 251) as u8; 256]).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("cut", size), &messages, |b, messages| {
            b.iter(|| {
                let mut cutter = BlockCutter::new(10, 4 * 1024 * 1024);
                let mut batches = 0usize;
                for data in messages {
                    let message = PendingMessage {
                        data: data.clone(),
                        ticket: (),
                    };
                    batches += cutter.ordered(message, false).batches.len();
                }
                black_box(batches)
            })
        });

        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let data = BlockData {
                data: messages.clone(),
            };
            group.bench_with_input(
                BenchmarkId::new(format!("data-hash-{algorithm:?}"), size),
                &data,
                |b, data| b.iter(|| black_box(data_hash(algorithm, data))),
            );
        }
    }

    group.bench_function("link-100-blocks", |b| {
        b.iter(|| {
            let mut tip: Option<BlockHeader> = None;
            for i in 0..100u64 {
                let block = next_block(
                    HashAlgorithm::Sha256,
                    tip.as_ref(),
                    vec![i.to_be_bytes().to_vec()],
                );
                tip = Some(block.header);
            }
            black_box(tip)
        })
    });

    group.finish();
}

fn bench_policy_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy-evaluation");
    let evaluator = PolicyEvaluator::new(Arc::new(Ed25519Verifier), PolicyConfig::default());

    for n in [3usize, 10, 50] {
        let keys: Vec<Ed25519KeyPair> = (0..n)
            .map(|i| Ed25519KeyPair::from_seed([i as u8 + 1; 32]))
            .collect();
        let identities: Vec<Vec<u8>> = keys
            .iter()
            .map(|k| k.public_key().as_bytes().to_vec())
            .collect();
        let policy = Policy::Signature(SignaturePolicyEnvelope {
            version: 0,
            policy: SignaturePolicy::n_out_of(
                (n / 2 + 1) as i32,
                (0..n as i32).map(SignaturePolicy::signed_by).collect(),
            ),
            identities: identities.clone(),
        });
        let signers = SignerSet::from_identities(identities);

        group.bench_with_input(BenchmarkId::new("majority", n), &policy, |b, policy| {
            b.iter(|| black_box(evaluator.evaluate(policy, &signers)))
        });

        let payload = b"configuration envelope bytes".to_vec();
        let signed: Vec<_> = keys
            .iter()
            .map(|k| sign_payload(k, &payload).unwrap())
            .collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("verify-signed", n), &signed, |b, signed| {
            b.iter(|| black_box(evaluator.verify_signed_data(signed, &payload)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_block_assembly, bench_policy_evaluation);
criterion_main!(benches);
