//! Channel behaviour under concurrent readers and writers

use std::thread;

use intcode_runtime::{Channel, Machine, OutputRecorder};
use proptest::prelude::*;

#[test]
fn test_many_writers_single_reader() {
    let channel = Channel::new();
    let writers: Vec<_> = (0..4)
        .map(|w| {
            let channel = channel.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    channel.write(w * 1_000 + i);
                }
            })
        })
        .collect();

    let mut received: Vec<i64> = (0..1_000).map(|_| channel.read()).collect();
    for writer in writers {
        writer.join().unwrap();
    }

    // Each writer's values stay in order relative to each other
    for w in 0..4 {
        let own: Vec<_> = received.iter().filter(|&&v| v / 1_000 == w).copied().collect();
        assert_eq!(own, (0..250).map(|i| w * 1_000 + i).collect::<Vec<_>>());
    }

    received.sort_unstable();
    received.dedup();
    assert_eq!(received.len(), 1_000);
    assert!(channel.is_empty());
}

#[test]
fn test_many_writers_many_readers() {
    let channel = Channel::new();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let channel = channel.clone();
            thread::spawn(move || (0..250).map(|_| channel.read()).collect::<Vec<i64>>())
        })
        .collect();
    let writers: Vec<_> = (0..4)
        .map(|w| {
            let channel = channel.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    channel.write(w * 1_000 + i);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    let mut received: Vec<i64> = readers
        .into_iter()
        .flat_map(|reader| reader.join().unwrap())
        .collect();

    // Every value delivered exactly once
    received.sort_unstable();
    let mut written: Vec<i64> = (0..4)
        .flat_map(|w| (0..250).map(move |i| w * 1_000 + i))
        .collect();
    written.sort_unstable();
    assert_eq!(received, written);
    assert!(channel.is_empty());
}

#[test]
fn test_machine_blocks_on_channel_input() {
    // The machine starts before its input exists
    let input = Channel::new();
    let output = OutputRecorder::new();
    let mut machine = Machine::parse("3,0,1001,0,1,0,4,0,99")
        .unwrap()
        .with_input(input.clone())
        .with_output(output.clone());

    let handle = thread::spawn(move || machine.execute());
    input.write(41);
    handle.join().unwrap().unwrap();

    assert_eq!(output.values(), vec![42]);
}

#[test]
fn test_machines_connected_by_channel() {
    // Producer emits 1..=5, consumer doubles whatever it reads five times
    let link = Channel::new();
    let output = OutputRecorder::new();

    let mut producer = Machine::parse("104,1,104,2,104,3,104,4,104,5,99")
        .unwrap()
        .with_output(link.clone());
    let mut consumer = Machine::parse(
        "1101,0,5,20,3,21,1002,21,2,21,4,21,1001,20,-1,20,1005,20,4,99",
    )
    .unwrap()
    .with_input(link.clone())
    .with_output(output.clone());

    let consumer = thread::spawn(move || consumer.execute());
    producer.execute().unwrap();
    consumer.join().unwrap().unwrap();

    assert_eq!(output.values(), vec![2, 4, 6, 8, 10]);
    assert!(link.is_empty());
}

proptest! {
    #[test]
    fn prop_fifo_across_threads(values in prop::collection::vec(any::<i64>(), 0..200)) {
        let channel = Channel::new();
        let writer = channel.clone();
        let sent = values.clone();
        let handle = thread::spawn(move || {
            for v in sent {
                writer.write(v);
            }
        });

        let received: Vec<i64> = (0..values.len()).map(|_| channel.read()).collect();
        handle.join().unwrap();
        prop_assert_eq!(received, values);
    }
}
