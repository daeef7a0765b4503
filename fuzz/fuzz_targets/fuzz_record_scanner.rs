//! Fuzz testing for the binary record field scanner.
//!
//! Feeds arbitrary bytes to `CompositeBinaryScanner` and checks that it never
//! panics, never yields a payload outside the input, and stops exactly at the
//! declared field count when the buffer is well formed.

#![no_main]

use libfuzzer_sys::fuzz_target;

use pgrecord::CompositeBinaryScanner;

fuzz_target!(|data: &[u8]| {
    let range = data.as_ptr_range();
    let mut scanner = CompositeBinaryScanner::new(data);
    let hint = scanner.capacity_hint();
    assert!(hint <= data.len() / 8);

    let mut yielded = 0u32;
    while scanner.advance() {
        yielded += 1;
        let field = scanner.current().expect("advance returned true");
        match field.payload {
            Some(bytes) => {
                assert_eq!(bytes.len() as i32, field.length);
                let bytes_range = bytes.as_ptr_range();
                assert!(bytes_range.start >= range.start && bytes_range.end <= range.end);
            }
            None => assert_eq!(field.length, -1),
        }
    }

    assert_eq!(yielded, scanner.fields_read());
    assert!(!scanner.advance());
    match scanner.error() {
        None => assert_eq!(scanner.fields_read(), scanner.field_count()),
        Some(_) => assert!(scanner.fields_read() <= scanner.field_count()),
    }
});
