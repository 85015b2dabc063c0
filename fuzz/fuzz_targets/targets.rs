#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(target) = ftpbench::fuzzing::parse_target_input(input) {
            debug_assert!(target.port() != 0);
            debug_assert!(!target.host().is_empty());
            let reparsed = ftpbench::fuzzing::parse_target_input(&target.address());
            debug_assert!(reparsed.is_ok());
        }
        if let Ok(list) = ftpbench::fuzzing::parse_targets_input(input) {
            debug_assert!(!list.as_slice().is_empty());
        }
    }
});
