#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(limit) = ftpbench::fuzzing::parse_maxrun_input(input) {
            if let Some(duration) = limit.duration() {
                debug_assert!(!duration.is_zero());
            }
        }
        if let Ok(duration) = ftpbench::fuzzing::parse_duration_arg_input(input) {
            debug_assert!(!duration.is_zero());
        }
    }
});
