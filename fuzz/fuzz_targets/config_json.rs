#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(args) = hammer::fuzzing::apply_config_from_json(data) {
        debug_assert!(args.rate <= hammer::engine::MAX_RATE);
        debug_assert!(args.workers <= hammer::engine::MAX_WORKERS);
        debug_assert!(args.worker_step.get() >= 1);
    }
});
