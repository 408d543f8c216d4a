//! Splits the input into short segments and adds every segment to a reference `MembershipSet`.
//! The same segments are then divided between two threads adding to one shared `AtomicMembershipSet`.
//! Both sets must end up with identical bits, and every segment must be contained in both.
#![no_main]
use libfuzzer_sys::fuzz_target;
use seeded_bloom::{AtomicMembershipSet, MembershipSet};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let chunk_size: usize = 6;
    let m = if data.len() < 30 {
        100
    } else {
        (data.len() / chunk_size) * 2
    };
    let k = 1 + data.first().map_or(0, |b| (*b % 6) as usize);

    let mut reference = MembershipSet::new(m, k).unwrap();
    let shared = Arc::new(AtomicMembershipSet::new(m, k).unwrap());

    let segments: Vec<&[u8]> = data
        .chunks(chunk_size)
        .inspect(|segment| reference.add(segment))
        .collect();

    let (evens, odds): (Vec<_>, Vec<_>) = segments
        .iter()
        .enumerate()
        .partition(|(index, _)| index % 2 == 0);

    crossbeam::scope(|scope| {
        for half in [evens, odds] {
            let set = Arc::clone(&shared);
            scope.spawn(move |_| half.iter().for_each(|(_, segment)| set.add(segment)));
        }
    })
    .unwrap();

    assert_eq!(format!("{:?}", reference), format!("{:?}", shared));
    segments.iter().for_each(|segment| {
        assert!(reference.contains(segment), "{:?} missing from reference", segment);
        assert!(shared.contains(segment), "{:?} missing from shared set", segment);
    });
});
