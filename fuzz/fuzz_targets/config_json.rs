#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(args) = ftpbench::fuzzing::apply_config_from_json(data) {
        debug_assert!(!args.hosts.as_slice().is_empty());
        debug_assert!(args.size.get() >= 1);
    }
});
