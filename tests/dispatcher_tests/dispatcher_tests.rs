//! Tests for Dispatcher
//!
//! These tests verify:
//! - Every supported service's positive response layout
//! - Length preconditions and negative response codes
//! - Totality over arbitrary requests
//! - Write-then-read round trips
//! - Concurrent writers never lose updates

use std::sync::Arc;
use std::thread;

use ecusim::config::Config;
use ecusim::dispatcher::Dispatcher;
use ecusim::protocol::ServiceId;
use ecusim::store::DataStore;

// =============================================================================
// Helper Functions
// =============================================================================

fn read_did(dispatcher: &Dispatcher, did: u16) -> Vec<u8> {
    let [hi, lo] = did.to_be_bytes();
    dispatcher.dispatch(&[0x22, hi, lo])
}

fn write_did(dispatcher: &Dispatcher, did: u16, value: &[u8]) -> Vec<u8> {
    let [hi, lo] = did.to_be_bytes();
    let mut request = vec![0x2E, hi, lo];
    request.extend_from_slice(value);
    dispatcher.dispatch(&request)
}

// =============================================================================
// Empty Request Tests
// =============================================================================

#[test]
fn test_empty_request_yields_empty_response() {
    let dispatcher = Dispatcher::seeded();
    assert!(dispatcher.dispatch(&[]).is_empty());
}

// =============================================================================
// Echoing Services Tests
// =============================================================================

#[test]
fn test_diagnostic_session_control_echoes_subfunction() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(dispatcher.dispatch(&[0x10, 0x03]), vec![0x50, 0x03]);
}

#[test]
fn test_ecu_reset_echoes_parameters() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(dispatcher.dispatch(&[0x11, 0x01]), vec![0x51, 0x01]);
}

#[test]
fn test_routine_control_echoes_parameters() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(
        dispatcher.dispatch(&[0x31, 0x01, 0xFF, 0x00]),
        vec![0x71, 0x01, 0xFF, 0x00]
    );
}

#[test]
fn test_echoing_services_accept_bare_sid() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(dispatcher.dispatch(&[0x10]), vec![0x50]);
    assert_eq!(dispatcher.dispatch(&[0x11]), vec![0x51]);
    assert_eq!(dispatcher.dispatch(&[0x31]), vec![0x71]);
}

// =============================================================================
// Read Data By Identifier Tests
// =============================================================================

#[test]
fn test_read_seeded_dids() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(read_did(&dispatcher, 0xF190), vec![0x62, 0xF1, 0x90, 0x00, 0x01, 0x23]);
    assert_eq!(read_did(&dispatcher, 0xF191), vec![0x62, 0xF1, 0x91, 0xAA, 0xBB, 0xCC]);
}

#[test]
fn test_read_unknown_did_is_out_of_range() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(read_did(&dispatcher, 0xF199), vec![0x7F, 0x22, 0x31]);
}

#[test]
fn test_read_too_short_is_incorrect_length() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(dispatcher.dispatch(&[0x22]), vec![0x7F, 0x22, 0x13]);
    assert_eq!(dispatcher.dispatch(&[0x22, 0xF1]), vec![0x7F, 0x22, 0x13]);
}

#[test]
fn test_read_ignores_trailing_bytes() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(
        dispatcher.dispatch(&[0x22, 0xF1, 0x90, 0xEE]),
        vec![0x62, 0xF1, 0x90, 0x00, 0x01, 0x23]
    );
}

#[test]
fn test_read_empty_value() {
    let store: DataStore = vec![(0x0042u16, Vec::<u8>::new())].into_iter().collect();
    let dispatcher = Dispatcher::new(store);
    assert_eq!(read_did(&dispatcher, 0x0042), vec![0x62, 0x00, 0x42]);
}

// =============================================================================
// Write Data By Identifier Tests
// =============================================================================

#[test]
fn test_write_new_did_then_read() {
    let dispatcher = Dispatcher::seeded();

    assert_eq!(write_did(&dispatcher, 0xF192, &[0xDE, 0xAD]), vec![0x6E, 0xF1, 0x92]);
    assert_eq!(read_did(&dispatcher, 0xF192), vec![0x62, 0xF1, 0x92, 0xDE, 0xAD]);
    assert_eq!(dispatcher.did_count(), 3);
}

#[test]
fn test_rewrite_existing_did_replaces_value() {
    let dispatcher = Dispatcher::seeded();

    assert_eq!(write_did(&dispatcher, 0xF190, &[0x07]), vec![0x6E, 0xF1, 0x90]);
    assert_eq!(read_did(&dispatcher, 0xF190), vec![0x62, 0xF1, 0x90, 0x07]);

    // Longer value replaces, no leftover from the shorter one
    write_did(&dispatcher, 0xF190, &[0x01, 0x02, 0x03, 0x04, 0x05]);
    assert_eq!(
        read_did(&dispatcher, 0xF190),
        vec![0x62, 0xF1, 0x90, 0x01, 0x02, 0x03, 0x04, 0x05]
    );
    assert_eq!(dispatcher.did_count(), 2);
}

#[test]
fn test_write_too_short_is_incorrect_length() {
    let dispatcher = Dispatcher::seeded();

    assert_eq!(dispatcher.dispatch(&[0x2E]), vec![0x7F, 0x2E, 0x13]);
    assert_eq!(dispatcher.dispatch(&[0x2E, 0xF1]), vec![0x7F, 0x2E, 0x13]);
    assert_eq!(dispatcher.dispatch(&[0x2E, 0xF1, 0x92]), vec![0x7F, 0x2E, 0x13]);

    // Nothing was stored by the rejected writes
    assert_eq!(read_did(&dispatcher, 0xF192), vec![0x7F, 0x22, 0x31]);
}

#[test]
fn test_write_round_trip_many_pairs() {
    let dispatcher = Dispatcher::new(DataStore::new());
    let pairs: Vec<(u16, Vec<u8>)> = vec![
        (0x0000, vec![0x00]),
        (0x00FF, vec![0xFF; 3]),
        (0x7F7F, vec![0x7F, 0x22, 0x31]),
        (0xFFFF, (0..=200).collect()),
    ];

    for (did, value) in &pairs {
        assert_eq!(write_did(&dispatcher, *did, value)[0], 0x6E);
    }
    for (did, value) in &pairs {
        let response = read_did(&dispatcher, *did);
        assert_eq!(&response[..3], &[0x62, (did >> 8) as u8, *did as u8]);
        assert_eq!(&response[3..], &value[..]);
    }
}

// =============================================================================
// Unsupported Service Tests
// =============================================================================

#[test]
fn test_unknown_sid_not_supported() {
    let dispatcher = Dispatcher::seeded();
    assert_eq!(dispatcher.dispatch(&[0x99]), vec![0x7F, 0x99, 0x11]);
}

#[test]
fn test_every_unsupported_sid_is_rejected() {
    let dispatcher = Dispatcher::seeded();

    for sid in 0u8..=255 {
        if ServiceId::from_byte(sid).is_some() {
            continue;
        }
        assert_eq!(dispatcher.dispatch(&[sid]), vec![0x7F, sid, 0x11], "SID 0x{:02X}", sid);
        assert_eq!(
            dispatcher.dispatch(&[sid, 0xF1, 0x90, 0x00]),
            vec![0x7F, sid, 0x11],
            "SID 0x{:02X} with parameters",
            sid
        );
    }
}

#[test]
fn test_dispatch_is_total() {
    let dispatcher = Dispatcher::seeded();

    for sid in 0u8..=255 {
        for len in 1..6usize {
            let mut request = vec![sid];
            request.extend((1..len).map(|i| i as u8));
            assert!(
                !dispatcher.dispatch(&request).is_empty(),
                "empty response for {:02X?}",
                request
            );
        }
    }
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_from_config_uses_config_seed() {
    let config = Config::builder()
        .seed(vec![(0x0100u16, vec![0x42u8])])
        .build();
    let dispatcher = Dispatcher::from_config(&config);

    assert_eq!(dispatcher.dids(), vec![0x0100]);
    assert_eq!(read_did(&dispatcher, 0x0100), vec![0x62, 0x01, 0x00, 0x42]);
    assert_eq!(read_did(&dispatcher, 0xF190), vec![0x7F, 0x22, 0x31]);
}

#[test]
fn test_default_dispatcher_is_seeded() {
    let dispatcher = Dispatcher::default();
    assert_eq!(dispatcher.dids(), vec![0xF190, 0xF191]);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writes_to_distinct_dids() {
    const THREADS: u16 = 8;
    const WRITES: u16 = 100;

    let dispatcher = Arc::new(Dispatcher::new(DataStore::new()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                for i in 0..WRITES {
                    let did = (t << 8) | i;
                    let response = write_did(&dispatcher, did, &did.to_be_bytes());
                    assert_eq!(response[0], 0x6E);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(dispatcher.did_count(), (THREADS * WRITES) as usize);
    for t in 0..THREADS {
        for i in 0..WRITES {
            let did = (t << 8) | i;
            let [hi, lo] = did.to_be_bytes();
            assert_eq!(read_did(&dispatcher, did), vec![0x62, hi, lo, hi, lo]);
        }
    }
}

#[test]
fn test_concurrent_readers_see_whole_values() {
    let dispatcher = Arc::new(Dispatcher::seeded());
    let old = vec![0x62, 0xF1, 0x90, 0x00, 0x01, 0x23];
    let new = vec![0x62, 0xF1, 0x90, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];

    let writer = {
        let dispatcher = Arc::clone(&dispatcher);
        thread::spawn(move || {
            for round in 0..500 {
                let value: &[u8] = if round % 2 == 0 {
                    &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]
                } else {
                    &[0x00, 0x01, 0x23]
                };
                write_did(&dispatcher, 0xF190, value);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            let (old, new) = (old.clone(), new.clone());
            thread::spawn(move || {
                for _ in 0..500 {
                    let response = read_did(&dispatcher, 0xF190);
                    assert!(response == old || response == new, "torn read: {:02X?}", response);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
