//! Batch lifecycle integration tests: staging isolation, atomic publish,
//! cancellation, idempotence, and concurrent chunk uploads.

use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};
use serde_json::json;

use lastprice::{PriceError, PriceRecord, PriceService};

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn record(id: &str, secs: i64, price: i64) -> PriceRecord {
    PriceRecord::new(id, ts(secs), json!({ "price": price }))
}

#[test]
fn single_batch_publish() {
    let service = PriceService::new(1000);

    let b1 = service.start_batch();
    service
        .upload_chunk(&b1, vec![record("AAPL", 100, 150)])
        .unwrap();
    assert!(service.complete_batch(&b1));

    let latest = service.latest_price("AAPL").unwrap();
    assert_eq!(latest.payload, json!({ "price": 150 }));
    assert_eq!(latest.as_of, ts(100));
}

#[test]
fn within_batch_last_write_wins_regardless_of_upload_order() {
    // t2 > t1 > t0; the t2 record must win inside the batch whatever the
    // chunk order, and must override the earlier batch's value in the store.
    let service = PriceService::new(1000);

    let b1 = service.start_batch();
    service
        .upload_chunk(&b1, vec![record("AAPL", 100, 150)])
        .unwrap();
    assert!(service.complete_batch(&b1));

    let b2 = service.start_batch();
    service
        .upload_chunk(&b2, vec![record("AAPL", 200, 155)])
        .unwrap();
    service
        .upload_chunk(&b2, vec![record("AAPL", 50, 100)])
        .unwrap();
    assert!(service.complete_batch(&b2));

    assert_eq!(
        service.latest_price("AAPL").unwrap().payload,
        json!({ "price": 155 })
    );
}

#[test]
fn staged_records_invisible_until_completion() {
    let service = PriceService::new(1000);

    let b1 = service.start_batch();
    service
        .upload_chunk(&b1, vec![record("AAPL", 100, 150), record("TSLA", 100, 700)])
        .unwrap();

    assert!(service.latest_price("AAPL").is_none());
    assert!(service
        .latest_prices(&["AAPL".to_string(), "TSLA".to_string()])
        .is_empty());

    assert!(service.complete_batch(&b1));
    let result = service.latest_prices(&["AAPL".to_string(), "TSLA".to_string()]);
    assert_eq!(result.len(), 2);
}

#[test]
fn cancelled_batch_publishes_nothing() {
    let service = PriceService::new(1000);

    let b3 = service.start_batch();
    service
        .upload_chunk(&b3, vec![record("TSLA", 100, 700)])
        .unwrap();
    assert!(service.cancel_batch(&b3));

    assert!(service.latest_price("TSLA").is_none());

    // The batch is gone: all later operations report no such batch.
    assert!(matches!(
        service.upload_chunk(&b3, vec![record("TSLA", 200, 710)]),
        Err(PriceError::BatchNotFound(_))
    ));
    assert!(!service.complete_batch(&b3));
}

#[test]
fn upload_to_unknown_batch_fails_whatever_the_chunk() {
    let service = PriceService::new(2);

    assert!(matches!(
        service.upload_chunk("no-such-batch", vec![]),
        Err(PriceError::BatchNotFound(_))
    ));
    assert!(matches!(
        service.upload_chunk("no-such-batch", vec![record("AAPL", 100, 150)]),
        Err(PriceError::BatchNotFound(_))
    ));

    // Oversized chunks also report the missing batch, not the size limit.
    let oversized: Vec<PriceRecord> = (0..3).map(|i| record(&format!("S{}", i), 100, i)).collect();
    assert!(matches!(
        service.upload_chunk("no-such-batch", oversized),
        Err(PriceError::BatchNotFound(_))
    ));
}

#[test]
fn terminal_transitions_are_idempotent_and_exclusive() {
    let service = PriceService::new(1000);

    let completed = service.start_batch();
    assert!(service.complete_batch(&completed));
    assert!(!service.complete_batch(&completed));
    assert!(!service.cancel_batch(&completed));

    let cancelled = service.start_batch();
    assert!(service.cancel_batch(&cancelled));
    assert!(!service.cancel_batch(&cancelled));
    assert!(!service.complete_batch(&cancelled));
}

#[test]
fn oversized_chunk_rejected_with_no_effect() {
    let service = PriceService::new(3);
    let b1 = service.start_batch();

    let chunk: Vec<PriceRecord> = (0..4).map(|i| record(&format!("S{}", i), 100, i)).collect();
    assert!(matches!(
        service.upload_chunk(&b1, chunk),
        Err(PriceError::InvalidArgument(_))
    ));

    assert!(service.complete_batch(&b1));
    assert_eq!(service.known_ids(), 0);
}

#[test]
fn completion_never_regresses_store() {
    let service = PriceService::new(1000);

    let b1 = service.start_batch();
    service
        .upload_chunk(&b1, vec![record("AAPL", 200, 155)])
        .unwrap();
    assert!(service.complete_batch(&b1));

    let b2 = service.start_batch();
    service
        .upload_chunk(&b2, vec![record("AAPL", 100, 150)])
        .unwrap();
    assert!(service.complete_batch(&b2));

    let latest = service.latest_price("AAPL").unwrap();
    assert_eq!(latest.as_of, ts(200));
    assert_eq!(latest.payload, json!({ "price": 155 }));
}

#[test]
fn concurrent_chunk_uploads_into_one_batch() {
    // Ten chunks of one hundred distinct ids each, uploaded in parallel,
    // then completed: all 1000 ids must be readable with correct values.
    let service = Arc::new(PriceService::new(1000));
    let batch_id = service.start_batch();

    let mut handles = vec![];
    for chunk_no in 0..10i64 {
        let service = Arc::clone(&service);
        let batch_id = batch_id.clone();
        handles.push(thread::spawn(move || {
            let chunk: Vec<PriceRecord> = (0..100)
                .map(|i| {
                    let n = chunk_no * 100 + i;
                    record(&format!("SYM{:04}", n), 100, n)
                })
                .collect();
            service.upload_chunk(&batch_id, chunk).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(service.complete_batch(&batch_id));
    assert_eq!(service.known_ids(), 1000);

    let latest = service.latest_price("SYM0542").unwrap();
    assert_eq!(latest.payload, json!({ "price": 542 }));
}

#[test]
fn concurrent_complete_and_cancel_one_winner() {
    for _ in 0..50 {
        let service = Arc::new(PriceService::new(1000));
        let batch_id = service.start_batch();
        service
            .upload_chunk(&batch_id, vec![record("AAPL", 100, 150)])
            .unwrap();

        let s1 = Arc::clone(&service);
        let s2 = Arc::clone(&service);
        let id1 = batch_id.clone();
        let id2 = batch_id.clone();

        let h1 = thread::spawn(move || s1.complete_batch(&id1));
        let h2 = thread::spawn(move || s2.cancel_batch(&id2));
        let completed = h1.join().unwrap();
        let cancelled = h2.join().unwrap();

        assert!(completed ^ cancelled, "exactly one terminal call must win");
        if completed {
            assert_eq!(
                service.latest_price("AAPL").unwrap().payload,
                json!({ "price": 150 })
            );
        } else {
            assert!(service.latest_price("AAPL").is_none());
        }
        assert_eq!(service.open_batches(), 0);
    }
}

#[test]
fn independent_batches_complete_concurrently() {
    let service = Arc::new(PriceService::new(1000));

    let mut handles = vec![];
    for b in 0..8i64 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            let batch_id = service.start_batch();
            service
                .upload_chunk(&batch_id, vec![record(&format!("ID{}", b), b + 1, b)])
                .unwrap();
            assert!(service.complete_batch(&batch_id));
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.known_ids(), 8);
    assert_eq!(service.open_batches(), 0);
}
