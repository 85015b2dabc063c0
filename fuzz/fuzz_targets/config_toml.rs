#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(args) = ftpbench::fuzzing::apply_config_from_toml(input) {
            debug_assert!(!args.hosts.as_slice().is_empty());
            debug_assert!(args.fixevery.get() >= 1);
            debug_assert!(!args.cleanup_timeout.is_zero());
        }
    }
});
