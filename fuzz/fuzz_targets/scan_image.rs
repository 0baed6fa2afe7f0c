#![no_main]
use fwver::Catalog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = fwver::scan(data, Catalog::builtin());
});
