#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&window_ms, rest)) = data.split_first() else {
        return;
    };
    let payload = if rest.len() > 3 * 4096 {
        &rest[..3 * 4096]
    } else {
        rest
    };
    let window = Duration::from_millis(u64::from(window_ms).saturating_add(1));

    let (recorded, expired) = hammer::fuzzing::window_record_input(payload, window);
    let total: u64 = recorded.status_counts.iter().map(|(_, count)| *count).sum();
    debug_assert_eq!(total, (payload.len() / 3) as u64);
    debug_assert!(expired.status_counts.is_empty());
    debug_assert_eq!(expired.max_latency, Duration::ZERO);
});
