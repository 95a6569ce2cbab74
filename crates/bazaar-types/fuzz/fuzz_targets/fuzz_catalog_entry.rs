#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary detail objects must normalize without panicking
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(details) = serde_json::from_str::<serde_json::Value>(s)
    {
        let plugin = bazaar_types::Plugin::from_entry("fuzz", &details);
        assert_eq!(plugin.name, "fuzz");
    }
});
