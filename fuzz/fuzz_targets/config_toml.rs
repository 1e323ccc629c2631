#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(args) = hammer::fuzzing::apply_config_from_toml(input) {
            debug_assert!(args.rate <= hammer::engine::MAX_RATE);
            debug_assert!(args.workers <= hammer::engine::MAX_WORKERS);
            debug_assert!(args.worker_step.get() >= 1);
        }
    }
});
