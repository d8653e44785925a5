#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = fridge_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // Anything that validates must also build an analyzer.
            let built = fridge_core::FridgeAnalyzer::builder()
                .with_filter((&cfg.filter).into())
                .with_items((&cfg.items).into())
                .try_build();
            assert!(built.is_ok(), "validated config rejected by builder");
        }
    }
});
