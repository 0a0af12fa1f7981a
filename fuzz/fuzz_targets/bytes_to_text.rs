#![no_main]

use libfuzzer_sys::fuzz_target;

use md2txt::{bytes_to_text, Options};

fuzz_target!(|data: &[u8]| {
    let _ = bytes_to_text(data, &Options::default());
});
